//! Run-length encoded style sequences.
//!
//! A [`StyleSpans`] describes the style of a run of characters independently of paragraph
//! boundaries: an ordered list of `(style, length)` pairs covering exactly
//! [`length()`](StyleSpans::length) characters.
//!
//! Sequences are always kept in reduced form: adjacent spans with equal styles are merged as
//! they are added and zero-length spans are dropped, except for a single placeholder span in an
//! otherwise empty sequence. Equality therefore only depends on the reduced content, never on
//! how the sequence was assembled.

use crate::error::DocumentError;
use crate::navigator::{Bias, Position, TwoLevelNavigator};
use std::ops::Range;

/// A single `(style, length)` run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleSpan<S> {
    style: S,
    length: usize,
}

impl<S> StyleSpan<S> {
    /// Create a new span.
    pub fn new(style: S, length: usize) -> Self {
        Self { style, length }
    }

    /// Style of the span.
    pub fn style(&self) -> &S {
        &self.style
    }

    /// Number of characters the span covers.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Split the span into its parts.
    pub fn into_parts(self) -> (S, usize) {
        (self.style, self.length)
    }
}

/// A non-empty, reduced sequence of style spans.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleSpans<S> {
    spans: Vec<StyleSpan<S>>,
    length: usize,
}

impl<S: Clone + PartialEq> StyleSpans<S> {
    /// A sequence consisting of one span.
    pub fn singleton(style: S, length: usize) -> Self {
        Self {
            spans: vec![StyleSpan::new(style, length)],
            length,
        }
    }

    /// Build a sequence from spans, merging and dropping as [`StyleSpansBuilder`] does.
    pub fn from_spans<I>(spans: I) -> Result<Self, DocumentError>
    where
        I: IntoIterator<Item = StyleSpan<S>>,
    {
        let mut builder = StyleSpansBuilder::new();
        builder.add_all(spans);
        builder.create()
    }

    /// Total number of characters covered.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of spans.
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// Span at `index`.
    pub fn style_span(&self, index: usize) -> Option<&StyleSpan<S>> {
        self.spans.get(index)
    }

    /// Iterate over the spans.
    pub fn iter(&self) -> std::slice::Iter<'_, StyleSpan<S>> {
        self.spans.iter()
    }

    /// Iterate over the styles of the spans.
    pub fn styles(&self) -> impl Iterator<Item = &S> {
        self.spans.iter().map(StyleSpan::style)
    }

    fn navigator(&self) -> TwoLevelNavigator<impl Fn(usize) -> usize + '_> {
        TwoLevelNavigator::new(self.spans.len(), move |i| self.spans[i].length)
    }

    /// Resolve an offset to `(span index, offset within span)`.
    pub fn offset_to_position(&self, offset: usize, bias: Bias) -> Position {
        self.navigator().offset_to_position(offset, bias)
    }

    /// Convert `(span index, offset within span)` back to an offset.
    pub fn position_to_offset(&self, position: Position) -> usize {
        self.navigator().position_to_offset(position)
    }

    /// Append a run, merging it into the last span when the styles are equal.
    pub fn append(self, style: S, length: usize) -> Self {
        let mut builder = StyleSpansBuilder::from(self);
        builder.add(style, length);
        builder.finish()
    }

    /// Prepend a run, merging it into the first span when the styles are equal.
    pub fn prepend(self, style: S, length: usize) -> Self {
        let mut builder = StyleSpansBuilder::with_capacity(self.spans.len() + 1);
        builder.add(style, length);
        builder.add_all(self.spans);
        builder.finish()
    }

    /// Concatenate two sequences.
    pub fn concat(&self, other: &StyleSpans<S>) -> Self {
        if other.length == 0 {
            return self.clone();
        }
        if self.length == 0 {
            return other.clone();
        }
        let mut builder = StyleSpansBuilder::with_capacity(self.spans.len() + other.spans.len());
        builder.add_all(self.spans.iter().cloned());
        builder.add_all(other.spans.iter().cloned());
        builder.finish()
    }

    /// Spans covering exactly `[from, to)`, splitting boundary spans.
    ///
    /// `to` is clamped to [`length()`](Self::length) and `from` to `to`. An empty range yields a
    /// single zero-length span carrying the style found at `from`.
    pub fn sub_view(&self, from: usize, to: usize) -> Self {
        let to = to.min(self.length);
        let from = from.min(to);
        if from == to {
            let pos = self.offset_to_position(from, Bias::Forward);
            let style = self.spans[pos.major.min(self.spans.len() - 1)].style.clone();
            return Self::singleton(style, 0);
        }

        let mut builder = StyleSpansBuilder::new();
        let mut span_start = 0;
        for span in &self.spans {
            let span_end = span_start + span.length;
            if span_end > from && span_start < to {
                let len = span_end.min(to) - span_start.max(from);
                builder.add(span.style.clone(), len);
            }
            if span_end >= to {
                break;
            }
            span_start = span_end;
        }
        builder.finish()
    }

    /// Apply `f` to every style, merging neighbours that end up equal.
    pub fn map_styles<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&S) -> S,
    {
        let mut builder = StyleSpansBuilder::with_capacity(self.spans.len());
        for span in &self.spans {
            builder.add(f(&span.style), span.length);
        }
        builder.finish()
    }

    /// Combine two sequences of equal length style by style.
    ///
    /// Walks both sequences in lock-step and emits `f(a, b)` for every maximal run where neither
    /// side changes style.
    pub fn overlay<F>(&self, other: &StyleSpans<S>, mut f: F) -> Result<Self, DocumentError>
    where
        F: FnMut(&S, &S) -> S,
    {
        if self.length != other.length {
            return Err(DocumentError::SpanLengthMismatch {
                left: self.length,
                right: other.length,
            });
        }

        let mut builder = StyleSpansBuilder::with_capacity(self.spans.len() + other.spans.len());
        let mut left = self.spans.iter();
        let mut right = other.spans.iter();
        let mut a = left.next().map(|s| (&s.style, s.length));
        let mut b = right.next().map(|s| (&s.style, s.length));

        while let (Some((style_a, len_a)), Some((style_b, len_b))) = (a, b) {
            let len = len_a.min(len_b);
            builder.add(f(style_a, style_b), len);
            a = if len_a > len {
                Some((style_a, len_a - len))
            } else {
                left.next().map(|s| (&s.style, s.length))
            };
            b = if len_b > len {
                Some((style_b, len_b - len))
            } else {
                right.next().map(|s| (&s.style, s.length))
            };
        }
        // Only zero-length tails can remain once the lengths agree.
        builder.create()
    }

    /// Range of homogeneous style containing `position`.
    ///
    /// At a boundary between two spans the range preceding `position` is returned.
    pub fn style_range(&self, position: usize) -> Range<usize> {
        let pos = self.offset_to_position(position.min(self.length), Bias::Backward);
        let major = pos.major.min(self.spans.len() - 1);
        let start = self.position_to_offset(Position::new(major, 0));
        start..start + self.spans[major].length
    }
}

impl<'a, S> IntoIterator for &'a StyleSpans<S> {
    type Item = &'a StyleSpan<S>;
    type IntoIter = std::slice::Iter<'a, StyleSpan<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

impl<S> IntoIterator for StyleSpans<S> {
    type Item = StyleSpan<S>;
    type IntoIter = std::vec::IntoIter<StyleSpan<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.into_iter()
    }
}

/// Incremental builder for [`StyleSpans`].
#[derive(Debug, Clone)]
pub struct StyleSpansBuilder<S> {
    spans: Vec<StyleSpan<S>>,
}

impl<S: Clone + PartialEq> StyleSpansBuilder<S> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self { spans: Vec::new() }
    }

    /// Create an empty builder with room for `capacity` spans.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            spans: Vec::with_capacity(capacity),
        }
    }

    /// Add a run.
    ///
    /// The first run is always kept, even with zero length, so that an empty sequence still
    /// knows its style. A later non-empty run replaces that placeholder. Other zero-length runs
    /// are dropped, and a run whose style equals the previous one extends it.
    pub fn add(&mut self, style: S, length: usize) -> &mut Self {
        self.add_span(StyleSpan::new(style, length))
    }

    /// Add a span; see [`add`](Self::add).
    pub fn add_span(&mut self, span: StyleSpan<S>) -> &mut Self {
        let single = self.spans.len() == 1;
        match self.spans.last_mut() {
            None => self.spans.push(span),
            Some(_) if span.length == 0 => {}
            Some(last) if single && last.length == 0 => *last = span,
            Some(last) if last.style == span.style => last.length += span.length,
            Some(_) => self.spans.push(span),
        }
        self
    }

    /// Add every span of `spans`.
    pub fn add_all<I>(&mut self, spans: I) -> &mut Self
    where
        I: IntoIterator<Item = StyleSpan<S>>,
    {
        for span in spans {
            self.add_span(span);
        }
        self
    }

    /// Returns `true` if nothing has been added yet.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Finish the sequence.
    pub fn create(self) -> Result<StyleSpans<S>, DocumentError> {
        if self.spans.is_empty() {
            return Err(DocumentError::EmptySpans);
        }
        let length = self.spans.iter().map(StyleSpan::length).sum();
        Ok(StyleSpans {
            spans: self.spans,
            length,
        })
    }

    /// Finish a builder known to hold at least one span.
    pub(crate) fn finish(self) -> StyleSpans<S> {
        let length = self.spans.iter().map(StyleSpan::length).sum();
        debug_assert!(!self.spans.is_empty());
        StyleSpans {
            spans: self.spans,
            length,
        }
    }
}

impl<S: Clone + PartialEq> Default for StyleSpansBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + PartialEq> From<StyleSpans<S>> for StyleSpansBuilder<S> {
    fn from(spans: StyleSpans<S>) -> Self {
        Self { spans: spans.spans }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(runs: &[(&'static str, usize)]) -> StyleSpans<&'static str> {
        StyleSpans::from_spans(runs.iter().map(|&(s, l)| StyleSpan::new(s, l))).unwrap()
    }

    #[test]
    fn test_add_merges_equal_styles() {
        let s = spans(&[("a", 2), ("a", 3), ("b", 1)]);
        assert_eq!(s.span_count(), 2);
        assert_eq!(s.length(), 6);
        assert_eq!(s.style_span(0), Some(&StyleSpan::new("a", 5)));
    }

    #[test]
    fn test_zero_length_placeholder_is_replaced() {
        let mut builder = StyleSpansBuilder::new();
        builder.add("x", 0);
        assert!(!builder.is_empty());
        builder.add("y", 0).add("z", 4);
        let s = builder.create().unwrap();
        assert_eq!(s, StyleSpans::singleton("z", 4));
    }

    #[test]
    fn test_empty_builder_is_an_error() {
        let builder: StyleSpansBuilder<u8> = StyleSpansBuilder::new();
        assert_eq!(builder.create(), Err(DocumentError::EmptySpans));
    }

    #[test]
    fn test_equality_ignores_assembly_history() {
        let a = spans(&[("a", 1), ("a", 1), ("b", 2)]);
        let b = StyleSpans::singleton("a", 2).append("b", 1).append("b", 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sub_view_splits_boundaries() {
        let s = spans(&[("a", 3), ("b", 3), ("c", 3)]);
        assert_eq!(s.sub_view(2, 7), spans(&[("a", 1), ("b", 3), ("c", 1)]));
        assert_eq!(s.sub_view(3, 6), spans(&[("b", 3)]));
        assert_eq!(s.sub_view(4, 4), StyleSpans::singleton("b", 0));
        assert_eq!(s.sub_view(0, 100).length(), 9);
    }

    #[test]
    fn test_concat_merges_at_seam() {
        let left = spans(&[("a", 1), ("b", 2)]);
        let right = spans(&[("b", 1), ("c", 1)]);
        assert_eq!(left.concat(&right), spans(&[("a", 1), ("b", 3), ("c", 1)]));
        assert_eq!(left.concat(&StyleSpans::singleton("z", 0)), left);
    }

    #[test]
    fn test_prepend() {
        let s = spans(&[("a", 2)]).prepend("a", 1).prepend("b", 1);
        assert_eq!(s, spans(&[("b", 1), ("a", 3)]));
    }

    #[test]
    fn test_overlay() {
        let a: StyleSpans<u32> = StyleSpans::from_spans([
            StyleSpan::new(1, 2),
            StyleSpan::new(2, 4),
        ])
        .unwrap();
        let b: StyleSpans<u32> = StyleSpans::from_spans([
            StyleSpan::new(10, 3),
            StyleSpan::new(20, 3),
        ])
        .unwrap();
        let combined = a.overlay(&b, |x, y| x + y).unwrap();
        let runs: Vec<(u32, usize)> = combined.iter().map(|s| (*s.style(), s.length())).collect();
        assert_eq!(runs, vec![(11, 2), (12, 1), (22, 3)]);
    }

    #[test]
    fn test_overlay_length_mismatch() {
        let a = StyleSpans::singleton(1u8, 2);
        let b = StyleSpans::singleton(1u8, 3);
        assert_eq!(
            a.overlay(&b, |x, _| *x),
            Err(DocumentError::SpanLengthMismatch { left: 2, right: 3 })
        );
    }

    #[test]
    fn test_map_styles_merges() {
        let s = spans(&[("a", 1), ("b", 2), ("c", 1)]);
        let mapped = s.map_styles(|st| if *st == "c" { "c" } else { "x" });
        assert_eq!(mapped, spans(&[("x", 3), ("c", 1)]));
    }

    #[test]
    fn test_style_range_prefers_preceding_run() {
        let s = spans(&[("a", 3), ("b", 2)]);
        assert_eq!(s.style_range(0), 0..3);
        assert_eq!(s.style_range(3), 0..3);
        assert_eq!(s.style_range(4), 3..5);
        assert_eq!(s.style_range(5), 3..5);
    }
}
