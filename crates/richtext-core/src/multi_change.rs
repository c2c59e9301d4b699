//! Several edits committed as one.
//!
//! A [`MultiChangeBuilder`] queues [`Replacement`]s and applies them to its
//! [`EditableDocument`] in a single pass with a single notification.
//!
//! Edits can be addressed two ways:
//!
//! - **relative** (`insert_text`, `delete_text`, `replace`, ...): offsets refer to the document as
//!   it was when the builder was created. Earlier queued edits are accounted for automatically.
//! - **absolute** (`*_absolute`): offsets refer to the document as it will be once every
//!   previously queued edit has been applied.
//!
//! ```rust
//! use richtext_core::EditableDocument;
//!
//! let mut doc = EditableDocument::from_text("(text)", (), ());
//! let mut builder = doc.create_multi_change(2);
//! builder.delete_text(0, 1).delete_text(5, 6);
//! builder.commit().unwrap();
//! assert_eq!(doc.text(), "text");
//! ```

use crate::document::ReadOnlyDocument;
use crate::editable::EditableDocument;
use crate::error::DocumentError;
use crate::navigator::Position;

/// One queued edit: `[start, end)` is replaced by `replacement`.
#[derive(Debug, Clone)]
pub struct Replacement<PS, S> {
    /// Start of the replaced range.
    pub start: usize,
    /// End (exclusive) of the replaced range.
    pub end: usize,
    /// Content put in place of the range.
    pub replacement: ReadOnlyDocument<PS, S>,
}

impl<PS: Clone + PartialEq, S: Clone + PartialEq> Replacement<PS, S> {
    /// Create a replacement.
    pub fn new(start: usize, end: usize, replacement: ReadOnlyDocument<PS, S>) -> Self {
        Self {
            start,
            end,
            replacement,
        }
    }

    /// Change in document length once applied.
    pub fn net_length(&self) -> isize {
        self.replacement.length() as isize - (self.end as isize - self.start as isize)
    }
}

impl<PS: Clone + PartialEq, S: Clone + PartialEq> PartialEq for Replacement<PS, S> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && self.replacement == other.replacement
    }
}

/// Single-use builder for a batch of edits. See the [module docs](self).
pub struct MultiChangeBuilder<'a, PS, S> {
    document: &'a mut EditableDocument<PS, S>,
    replacements: Vec<Replacement<PS, S>>,
    invalid: Option<DocumentError>,
    committed: bool,
}

impl<'a, PS: Clone + PartialEq, S: Clone + PartialEq> MultiChangeBuilder<'a, PS, S> {
    pub(crate) fn new(document: &'a mut EditableDocument<PS, S>, capacity: usize) -> Self {
        Self {
            document,
            replacements: Vec::with_capacity(capacity),
            invalid: None,
            committed: false,
        }
    }

    /// Edits queued so far, in absolute coordinates.
    pub fn replacements(&self) -> &[Replacement<PS, S>] {
        &self.replacements
    }

    /// Returns `true` once [`commit`](Self::commit) has succeeded.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Insert `text` at `offset`.
    pub fn insert_text(&mut self, offset: usize, text: &str) -> &mut Self {
        self.replace_text(offset, offset, text)
    }

    /// Insert `text` at `offset`, in absolute coordinates.
    pub fn insert_text_absolute(&mut self, offset: usize, text: &str) -> &mut Self {
        self.replace_text_absolute(offset, offset, text)
    }

    /// Insert `text` at column `column` of paragraph `paragraph`.
    pub fn insert_text_at(&mut self, paragraph: usize, column: usize, text: &str) -> Result<&mut Self, DocumentError> {
        let offset = self.offset_of(paragraph, column)?;
        Ok(self.insert_text(offset, text))
    }

    /// Insert `text` at column `column` of paragraph `paragraph`, in absolute coordinates.
    pub fn insert_text_at_absolute(
        &mut self,
        paragraph: usize,
        column: usize,
        text: &str,
    ) -> Result<&mut Self, DocumentError> {
        let offset = self.offset_of(paragraph, column)?;
        Ok(self.insert_text_absolute(offset, text))
    }

    /// Insert a styled document at `offset`.
    pub fn insert(&mut self, offset: usize, document: ReadOnlyDocument<PS, S>) -> &mut Self {
        self.replace(offset, offset, document)
    }

    /// Insert a styled document at `offset`, in absolute coordinates.
    pub fn insert_absolute(&mut self, offset: usize, document: ReadOnlyDocument<PS, S>) -> &mut Self {
        self.replace_absolute(offset, offset, document)
    }

    /// Delete `[start, end)`.
    pub fn delete_text(&mut self, start: usize, end: usize) -> &mut Self {
        self.replace_text(start, end, "")
    }

    /// Delete `[start, end)`, in absolute coordinates.
    pub fn delete_text_absolute(&mut self, start: usize, end: usize) -> &mut Self {
        self.replace_text_absolute(start, end, "")
    }

    /// Delete from `(start_paragraph, start_column)` to `(end_paragraph, end_column)`.
    pub fn delete_text_between(
        &mut self,
        start_paragraph: usize,
        start_column: usize,
        end_paragraph: usize,
        end_column: usize,
    ) -> Result<&mut Self, DocumentError> {
        let start = self.offset_of(start_paragraph, start_column)?;
        let end = self.offset_of(end_paragraph, end_column)?;
        Ok(self.delete_text(start, end))
    }

    /// Like [`delete_text_between`](Self::delete_text_between), in absolute coordinates.
    pub fn delete_text_between_absolute(
        &mut self,
        start_paragraph: usize,
        start_column: usize,
        end_paragraph: usize,
        end_column: usize,
    ) -> Result<&mut Self, DocumentError> {
        let start = self.offset_of(start_paragraph, start_column)?;
        let end = self.offset_of(end_paragraph, end_column)?;
        Ok(self.delete_text_absolute(start, end))
    }

    /// Replace `[start, end)` with `text`.
    ///
    /// The text is styled according to the document's configuration, looked up in the document
    /// as it is now.
    pub fn replace_text(&mut self, start: usize, end: usize, text: &str) -> &mut Self {
        let replacement = self.styled_text(start, text);
        self.replace(start, end, replacement)
    }

    /// Replace `[start, end)` with `text`, in absolute coordinates.
    pub fn replace_text_absolute(&mut self, start: usize, end: usize, text: &str) -> &mut Self {
        let replacement = self.styled_text(start, text);
        self.replace_absolute(start, end, replacement)
    }

    /// Replace `[start, end)` with a styled document.
    ///
    /// If an earlier queued edit shifts the range before offset 0, nothing is queued and
    /// [`commit`](Self::commit) fails with [`DocumentError::InvalidRange`].
    pub fn replace(&mut self, start: usize, end: usize, replacement: ReadOnlyDocument<PS, S>) -> &mut Self {
        match self.adjust(start, end) {
            Some((real_start, real_end)) => self.replace_absolute(real_start, real_end, replacement),
            None => {
                tracing::warn!(start, end, "relative edit shifted before the document start");
                if self.invalid.is_none() {
                    self.invalid = Some(DocumentError::InvalidRange {
                        start,
                        end,
                        length: self.document.length(),
                    });
                }
                self
            }
        }
    }

    /// Replace `[start, end)` with a styled document, in absolute coordinates.
    pub fn replace_absolute(
        &mut self,
        start: usize,
        end: usize,
        replacement: ReadOnlyDocument<PS, S>,
    ) -> &mut Self {
        self.replacements.push(Replacement::new(start, end, replacement));
        self
    }

    /// Apply every queued edit as one logical edit.
    ///
    /// Fails with [`DocumentError::AlreadyCommitted`] on a second call and with
    /// [`DocumentError::EmptyBatch`] when nothing was queued. If an edit is out of range the
    /// document is left untouched.
    pub fn commit(&mut self) -> Result<(), DocumentError> {
        if self.committed {
            return Err(DocumentError::AlreadyCommitted);
        }
        if let Some(err) = &self.invalid {
            return Err(err.clone());
        }
        if self.replacements.is_empty() {
            return Err(DocumentError::EmptyBatch);
        }
        tracing::debug!(edits = self.replacements.len(), "committing multi-change");
        self.document.replace_multi(&self.replacements)?;
        self.committed = true;
        Ok(())
    }

    /// Map a range of the original document through every queued edit.
    fn adjust(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        let (mut start, mut end) = (start, end);
        for r in &self.replacements {
            let net = r.net_length();
            if r.start <= start {
                start = start.checked_add_signed(net)?;
                if r.end <= end {
                    end = end.checked_add_signed(net)?;
                }
            } else if r.end <= end {
                end = end.checked_add_signed(net)?;
            }
        }
        Some((start, end))
    }

    fn offset_of(&self, paragraph: usize, column: usize) -> Result<usize, DocumentError> {
        self.document
            .position_to_offset(Position::new(paragraph, column))
    }

    fn styled_text(&self, offset: usize, text: &str) -> ReadOnlyDocument<PS, S> {
        let style = self.document.config().text_insertion_style();
        let offset = offset.min(self.document.length());
        self.document
            .styled_text(offset, text, &style)
            .unwrap_or_else(|_| {
                ReadOnlyDocument::from_text(
                    text,
                    self.document.initial_paragraph_style().clone(),
                    self.document.initial_style().clone(),
                )
            })
    }
}
