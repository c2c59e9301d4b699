//! Immutable styled paragraphs.
//!
//! A [`Paragraph`] is one line of a document: an ordered, non-empty list of [`StyledSegment`]s,
//! a paragraph-level style and the [`LineTerminator`] that ends it. Every operation returns a new
//! paragraph; the receiver is never modified.
//!
//! Segments are kept reduced: neighbours with equal styles are fused and empty segments are
//! dropped, except for the single empty segment of an empty paragraph, which remembers the style
//! new text typed into it should get.
//!
//! Columns run over the full paragraph, terminator included: `0..length()` addresses text and
//! `length()..full_length()` the terminator characters.

use crate::error::{DocumentError, check_offset};
use crate::line_terminator::LineTerminator;
use crate::navigator::{Bias, Position, TwoLevelNavigator};
use crate::segment::StyledSegment;
use crate::style_spans::{StyleSpans, StyleSpansBuilder};
use crate::text::{char_len, char_slice};
use std::ops::Range;

/// One styled line of text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Paragraph<PS, S> {
    paragraph_style: PS,
    segments: Vec<StyledSegment<S>>,
    terminator: LineTerminator,
    length: usize,
}

impl<PS: Clone, S: Clone + PartialEq> Paragraph<PS, S> {
    /// An unterminated paragraph with uniformly styled text.
    ///
    /// `text` is taken verbatim; use
    /// [`ReadOnlyDocument::from_text`](crate::ReadOnlyDocument::from_text) to split text on line
    /// terminators.
    pub fn new(paragraph_style: PS, text: impl Into<String>, style: S) -> Self {
        let segment = StyledSegment::new(text, style);
        Self {
            length: segment.length(),
            paragraph_style,
            segments: vec![segment],
            terminator: LineTerminator::None,
        }
    }

    /// An empty, unterminated paragraph remembering `style`.
    pub fn empty(paragraph_style: PS, style: S) -> Self {
        Self {
            paragraph_style,
            segments: vec![StyledSegment::empty(style)],
            terminator: LineTerminator::None,
            length: 0,
        }
    }

    /// Build a paragraph from segments, fusing equal neighbours and dropping empty ones.
    pub fn from_segments<I>(
        paragraph_style: PS,
        segments: I,
        terminator: LineTerminator,
    ) -> Result<Self, DocumentError>
    where
        I: IntoIterator<Item = StyledSegment<S>>,
    {
        let segments = normalize(segments);
        if segments.is_empty() {
            return Err(DocumentError::EmptyParagraph);
        }
        Ok(Self::from_reduced(paragraph_style, segments, terminator))
    }

    fn from_reduced(
        paragraph_style: PS,
        segments: Vec<StyledSegment<S>>,
        terminator: LineTerminator,
    ) -> Self {
        let length = segments.iter().map(StyledSegment::length).sum();
        Self {
            paragraph_style,
            segments,
            terminator,
            length,
        }
    }

    pub(crate) fn into_terminated(mut self, terminator: LineTerminator) -> Self {
        self.terminator = terminator;
        self
    }

    /// Same content with a different terminator.
    pub fn with_terminator(&self, terminator: LineTerminator) -> Self {
        Self {
            terminator,
            ..self.clone()
        }
    }

    /// Paragraph-level style.
    pub fn paragraph_style(&self) -> &PS {
        &self.paragraph_style
    }

    /// Styled segments; never empty.
    pub fn segments(&self) -> &[StyledSegment<S>] {
        &self.segments
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Terminator ending this paragraph.
    pub fn terminator(&self) -> LineTerminator {
        self.terminator
    }

    /// Text length in characters, terminator excluded.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Text length plus terminator length.
    pub fn full_length(&self) -> usize {
        self.length + self.terminator.len()
    }

    /// Returns `true` if the paragraph holds no text (it may still be terminated).
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Text without terminator.
    pub fn text(&self) -> String {
        let mut text = String::with_capacity(self.segments.iter().map(|s| s.text().len()).sum());
        for seg in &self.segments {
            text.push_str(seg.text());
        }
        text
    }

    /// Text followed by the terminator.
    pub fn full_text(&self) -> String {
        let mut text = self.text();
        text.push_str(self.terminator.as_str());
        text
    }

    /// Character at `index`, terminator characters included.
    pub fn char_at(&self, index: usize) -> Option<char> {
        if index >= self.length {
            return self.terminator.as_str().chars().nth(index - self.length);
        }
        let pos = self.segment_position(index, Bias::Forward);
        self.segments[pos.major].text().chars().nth(pos.minor)
    }

    /// Characters `[from, to)` of the full text, clamped to [`full_length`](Self::full_length).
    pub fn substring(&self, from: usize, to: usize) -> String {
        let full = self.full_text();
        char_slice(&full, from, to).to_string()
    }

    /// Resolve a column to `(segment index, offset within segment)`.
    ///
    /// Columns past the text resolve into the last segment.
    pub fn segment_position(&self, offset: usize, bias: Bias) -> Position {
        TwoLevelNavigator::new(self.segments.len(), |i| self.segments[i].length())
            .offset_to_position(offset, bias)
    }

    fn first_style(&self) -> &S {
        self.segments[0].style()
    }

    fn last_style(&self) -> &S {
        self.segments[self.segments.len() - 1].style()
    }

    /// Keep the first `length` columns.
    ///
    /// The result is unterminated unless `length` reaches into the terminator, in which case the
    /// terminator is cut accordingly (a CRLF trimmed after the CR becomes CR). Trimming to zero
    /// leaves an empty paragraph carrying the first segment's style.
    pub fn trim(&self, length: usize) -> Self {
        if length >= self.length {
            return self.with_terminator(self.terminator.trim(length - self.length));
        }
        let pos = self.segment_position(length, Bias::Backward);
        let mut segments = Vec::with_capacity(pos.major + 1);
        segments.extend_from_slice(&self.segments[..pos.major]);
        segments.push(self.segments[pos.major].sub_sequence(0, pos.minor));
        Self::from_reduced(self.paragraph_style.clone(), segments, LineTerminator::None)
    }

    /// Drop the first `start` columns.
    ///
    /// The terminator is kept, or cut when `start` reaches into it. Starting at or past the text
    /// end leaves an empty paragraph carrying the last segment's style.
    pub fn sub_sequence(&self, start: usize) -> Self {
        if start == 0 {
            return self.clone();
        }
        if start >= self.length {
            return Self {
                paragraph_style: self.paragraph_style.clone(),
                segments: vec![StyledSegment::empty(self.last_style().clone())],
                terminator: self.terminator.sub_sequence(start - self.length),
                length: 0,
            };
        }
        let pos = self.segment_position(start, Bias::Forward);
        let mut segments = Vec::with_capacity(self.segments.len() - pos.major);
        segments.push(self.segments[pos.major].sub_sequence(pos.minor, usize::MAX));
        segments.extend_from_slice(&self.segments[pos.major + 1..]);
        Self::from_reduced(self.paragraph_style.clone(), segments, self.terminator)
    }

    /// Columns `[start, end)`.
    pub fn sub_sequence_range(&self, start: usize, end: usize) -> Self {
        self.trim(end).sub_sequence(start)
    }

    /// Remove columns `[from, to)`, clamped to [`full_length`](Self::full_length).
    pub fn delete(&self, from: usize, to: usize) -> Self {
        let to = to.min(self.full_length());
        let from = from.min(to);
        let text = self
            .trim(from.min(self.length))
            .concat(&self.sub_sequence(to.min(self.length)));

        let terminator = self.terminator.as_str();
        let kept_head = &terminator[..from.saturating_sub(self.length)];
        let kept_tail = &terminator[to.saturating_sub(self.length)..];
        let terminator = LineTerminator::from_str_exact(&format!("{kept_head}{kept_tail}"))
            .unwrap_or(self.terminator);
        text.with_terminator(terminator)
    }

    /// Append `other`.
    ///
    /// Produces one paragraph whose terminator is `other`'s; the receiver's terminator is
    /// discarded, so callers only concatenate onto unterminated paragraphs. Boundary segments
    /// with equal styles fuse. The paragraph style is the receiver's unless the receiver has no
    /// text and `other` does.
    pub fn concat(&self, other: &Self) -> Self {
        if other.length == 0 {
            return self.with_terminator(other.terminator);
        }
        if self.length == 0 {
            return other.clone();
        }
        let segments = normalize(self.segments.iter().chain(&other.segments).cloned());
        Self::from_reduced(self.paragraph_style.clone(), segments, other.terminator)
    }

    /// Like [`concat`](Self::concat), but when neither side has text the result takes
    /// `other`'s styles.
    pub fn concat_r(&self, other: &Self) -> Self {
        if self.length == 0 {
            return other.clone();
        }
        self.concat(other)
    }

    /// Insert `text` at column `offset`, giving it the style of the character before it.
    ///
    /// `text` must not contain line terminators.
    pub fn insert(&self, offset: usize, text: &str) -> Result<Self, DocumentError> {
        check_offset(offset, self.length)?;
        if text.is_empty() {
            return Ok(self.clone());
        }
        let pos = self.segment_position(offset, Bias::Backward);
        let mut segments = self.segments.clone();
        segments[pos.major] = segments[pos.major].spliced(pos.minor, text);
        Ok(Self {
            paragraph_style: self.paragraph_style.clone(),
            segments,
            terminator: self.terminator,
            length: self.length + char_len(text),
        })
    }

    /// Give the whole text one style.
    pub fn restyle(&self, style: S) -> Self {
        Self {
            paragraph_style: self.paragraph_style.clone(),
            segments: vec![StyledSegment::new(self.text(), style)],
            terminator: self.terminator,
            length: self.length,
        }
    }

    /// Restyle columns `[from, to)`.
    ///
    /// `to` is clamped to [`length`](Self::length); `from >= length()` returns the paragraph
    /// unchanged. Terminators carry no style of their own.
    pub fn restyle_range(&self, from: usize, to: usize, style: S) -> Self {
        let to = to.min(self.length);
        if from >= to {
            return self.clone();
        }
        let middle = Self::new(
            self.paragraph_style.clone(),
            self.substring(from, to),
            style,
        );
        self.trim(from)
            .concat(&middle)
            .concat(&self.sub_sequence(to))
    }

    /// Apply `spans` starting at column `from`, clamped like
    /// [`restyle_range`](Self::restyle_range).
    pub fn restyle_spans(&self, from: usize, spans: &StyleSpans<S>) -> Self {
        let to = from.saturating_add(spans.length()).min(self.length);
        if from >= to {
            return self.clone();
        }
        let middle_text = self.substring(from, to);
        let middle_len = to - from;
        let mut segments = Vec::with_capacity(spans.span_count());
        let mut offset = 0;
        for span in spans {
            if offset >= middle_len {
                break;
            }
            let end = (offset + span.length()).min(middle_len);
            segments.push(StyledSegment::new(
                char_slice(&middle_text, offset, end),
                span.style().clone(),
            ));
            offset = end;
        }
        let middle = Self::from_reduced(
            self.paragraph_style.clone(),
            normalize(segments),
            LineTerminator::None,
        );
        self.trim(from)
            .concat(&middle)
            .concat(&self.sub_sequence(to))
    }

    /// Same content with a different paragraph style.
    pub fn set_paragraph_style(&self, paragraph_style: PS) -> Self {
        Self {
            paragraph_style,
            ..self.clone()
        }
    }

    /// Style of the character at `index`.
    ///
    /// Indices at or past the text end (terminator included) report the last segment's style.
    pub fn style_of_char(&self, index: usize) -> &S {
        if index >= self.length {
            return self.last_style();
        }
        let pos = self.segment_position(index, Bias::Forward);
        self.segments[pos.major].style()
    }

    /// Style at a caret position: the style of the character before it, or of the first
    /// character at position 0.
    pub fn style_at_position(&self, position: usize) -> &S {
        match position.min(self.length).checked_sub(1) {
            Some(index) => self.style_of_char(index),
            None => self.first_style(),
        }
    }

    /// Range of homogeneous style containing `position`.
    ///
    /// At a boundary between two segments the range preceding `position` is returned.
    pub fn style_range_at_position(&self, position: usize) -> Range<usize> {
        let position = position.min(self.length);
        let pos = self.segment_position(position, Bias::Backward);
        let start = position - pos.minor;
        start..start + self.segments[pos.major].length()
    }

    /// Style spans over the full paragraph.
    ///
    /// Terminator characters are reported with the last segment's style.
    pub fn style_spans(&self) -> StyleSpans<S> {
        let mut builder = StyleSpansBuilder::with_capacity(self.segments.len());
        for seg in &self.segments {
            builder.add(seg.style().clone(), seg.length());
        }
        builder.add(self.last_style().clone(), self.terminator.len());
        builder.finish()
    }

    /// Style spans over columns `[from, to)`, clamped to [`full_length`](Self::full_length).
    pub fn style_spans_range(&self, from: usize, to: usize) -> StyleSpans<S> {
        self.style_spans().sub_view(from, to)
    }
}

/// Fuse equal-style neighbours and drop empty segments, keeping one if all are empty.
fn normalize<S, I>(segments: I) -> Vec<StyledSegment<S>>
where
    S: PartialEq,
    I: IntoIterator<Item = StyledSegment<S>>,
{
    let mut out: Vec<StyledSegment<S>> = Vec::new();
    for seg in segments {
        match out.last_mut() {
            None => out.push(seg),
            Some(_) if seg.is_empty() => {}
            Some(last) if last.is_empty() => *last = seg,
            Some(last) if last.style() == seg.style() => last.push_str(seg.text(), seg.length()),
            Some(_) => out.push(seg),
        }
    }
    out
}
