//! Uniformly styled text runs.

use crate::text::{char_len, char_slice};

/// A run of text sharing a single style.
///
/// Lengths are measured in `char`s and cached, so [`length`](Self::length) is O(1).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyledSegment<S> {
    text: String,
    style: S,
    length: usize,
}

impl<S> StyledSegment<S> {
    /// Create a segment.
    pub fn new(text: impl Into<String>, style: S) -> Self {
        let text = text.into();
        let length = char_len(&text);
        Self {
            text,
            style,
            length,
        }
    }

    /// An empty segment that only carries a style.
    pub fn empty(style: S) -> Self {
        Self {
            text: String::new(),
            style,
            length: 0,
        }
    }

    /// Text of the segment.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Style of the segment.
    pub fn style(&self) -> &S {
        &self.style
    }

    /// Length in characters.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns `true` if the segment holds no text.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Split the segment into its text and style.
    pub fn into_parts(self) -> (String, S) {
        (self.text, self.style)
    }

    pub(crate) fn push_str(&mut self, text: &str, length: usize) {
        self.text.push_str(text);
        self.length += length;
    }
}

impl<S: Clone> StyledSegment<S> {
    /// Characters `[from, to)` of this segment, clamped to its length.
    pub fn sub_sequence(&self, from: usize, to: usize) -> Self {
        let to = to.min(self.length);
        let from = from.min(to);
        if from == 0 && to == self.length {
            return self.clone();
        }
        Self {
            text: char_slice(&self.text, from, to).to_string(),
            style: self.style.clone(),
            length: to - from,
        }
    }

    /// Same text, different style.
    pub fn with_style(&self, style: S) -> Self {
        Self {
            text: self.text.clone(),
            style,
            length: self.length,
        }
    }

    /// Insert `text` at character `offset`, keeping this segment's style.
    pub(crate) fn spliced(&self, offset: usize, text: &str) -> Self {
        let split = crate::text::byte_index(&self.text, offset);
        let mut out = String::with_capacity(self.text.len() + text.len());
        out.push_str(&self.text[..split]);
        out.push_str(text);
        out.push_str(&self.text[split..]);
        Self {
            length: self.length + char_len(text),
            text: out,
            style: self.style.clone(),
        }
    }
}
