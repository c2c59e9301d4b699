//! Change records.
//!
//! Every committed edit is described by a [`TextChange`]: the offset it happened at, the content
//! it removed and the content it inserted. Records are self-contained, so an undo manager can
//! replay them backwards with [`TextChange::invert`] and coalesce typing with
//! [`TextChange::merge_with`].
//!
//! Two flavours exist:
//!
//! - [`PlainTextChange`]: removed and inserted text only;
//! - [`RichTextChange`]: removed and inserted sub-documents, styles included.

use crate::document::ReadOnlyDocument;
use crate::paragraph::Paragraph;
use crate::text::{char_len, char_slice};

/// Content that can be carried by a [`TextChange`].
pub trait ChangeContent: Clone + PartialEq {
    /// Length in characters.
    fn content_length(&self) -> usize;

    /// `self` followed by `other`.
    fn concat_content(&self, other: &Self) -> Self;

    /// Characters `[from, to)`.
    fn sub_content(&self, from: usize, to: usize) -> Self;
}

impl ChangeContent for String {
    fn content_length(&self) -> usize {
        char_len(self)
    }

    fn concat_content(&self, other: &Self) -> Self {
        let mut out = String::with_capacity(self.len() + other.len());
        out.push_str(self);
        out.push_str(other);
        out
    }

    fn sub_content(&self, from: usize, to: usize) -> Self {
        char_slice(self, from, to).to_string()
    }
}

impl<PS: Clone + PartialEq, S: Clone + PartialEq> ChangeContent for ReadOnlyDocument<PS, S> {
    fn content_length(&self) -> usize {
        self.length()
    }

    fn concat_content(&self, other: &Self) -> Self {
        self.concat(other)
    }

    fn sub_content(&self, from: usize, to: usize) -> Self {
        let to = to.min(self.length());
        self.sub_document(from.min(to), to)
            .unwrap_or_else(|_| self.clone())
    }
}

/// What a change did to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Only inserted content.
    Insertion,
    /// Only removed content.
    Deletion,
    /// Removed and inserted content.
    Replacement,
}

/// One edit: `removed` was replaced by `inserted` at `position`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextChange<T> {
    position: usize,
    removed: T,
    inserted: T,
}

/// A change carrying plain text.
pub type PlainTextChange = TextChange<String>;

/// A change carrying styled sub-documents.
pub type RichTextChange<PS, S> = TextChange<ReadOnlyDocument<PS, S>>;

impl<T: ChangeContent> TextChange<T> {
    /// Create a change record.
    pub fn new(position: usize, removed: T, inserted: T) -> Self {
        Self {
            position,
            removed,
            inserted,
        }
    }

    /// Offset the change starts at.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Removed content.
    pub fn removed(&self) -> &T {
        &self.removed
    }

    /// Inserted content.
    pub fn inserted(&self) -> &T {
        &self.inserted
    }

    /// Length of the removed content.
    pub fn removed_length(&self) -> usize {
        self.removed.content_length()
    }

    /// Length of the inserted content.
    pub fn inserted_length(&self) -> usize {
        self.inserted.content_length()
    }

    /// End of the removed range in the document before the change.
    pub fn removal_end(&self) -> usize {
        self.position + self.removed_length()
    }

    /// End of the inserted range in the document after the change.
    pub fn insertion_end(&self) -> usize {
        self.position + self.inserted_length()
    }

    /// `inserted_length() - removed_length()`.
    pub fn net_length(&self) -> isize {
        self.inserted_length() as isize - self.removed_length() as isize
    }

    /// Returns `true` if the change removes exactly what it inserts.
    pub fn is_identity(&self) -> bool {
        self.removed == self.inserted
    }

    /// Classify the change; `None` if it neither removes nor inserts anything.
    pub fn kind(&self) -> Option<ChangeKind> {
        match (self.removed_length() > 0, self.inserted_length() > 0) {
            (false, false) => None,
            (false, true) => Some(ChangeKind::Insertion),
            (true, false) => Some(ChangeKind::Deletion),
            (true, true) => Some(ChangeKind::Replacement),
        }
    }

    /// The change that undoes this one.
    pub fn invert(&self) -> Self {
        Self::new(self.position, self.inserted.clone(), self.removed.clone())
    }

    /// Merge `self` with a change that was applied right after it.
    ///
    /// Succeeds when `later` starts where this change's insertion ended, or when `later`'s
    /// removal ends there (an edit working backwards, such as repeated backspace). Returns
    /// `None` otherwise.
    pub fn merge_with(&self, later: &Self) -> Option<Self> {
        let insertion_end = self.insertion_end();
        if later.position == insertion_end {
            return Some(Self::new(
                self.position,
                self.removed.concat_content(&later.removed),
                self.inserted.concat_content(&later.inserted),
            ));
        }
        if later.removal_end() != insertion_end {
            return None;
        }
        if self.position <= later.position {
            let kept = self.inserted.sub_content(0, later.position - self.position);
            Some(Self::new(
                self.position,
                self.removed.clone(),
                kept.concat_content(&later.inserted),
            ))
        } else {
            let extra = later.removed.sub_content(0, self.position - later.position);
            Some(Self::new(
                later.position,
                extra.concat_content(&self.removed),
                later.inserted.clone(),
            ))
        }
    }
}

impl<PS: Clone + PartialEq, S: Clone + PartialEq> TextChange<ReadOnlyDocument<PS, S>> {
    /// Drop styles, keeping only the text.
    pub fn to_plain(&self) -> PlainTextChange {
        TextChange::new(self.position, self.removed.text(), self.inserted.text())
    }

    /// Returns `true` if the change leaves the text unchanged (a pure style change).
    pub fn is_plain_text_identity(&self) -> bool {
        self.removed.length() == self.inserted.length() && self.removed.text() == self.inserted.text()
    }
}

/// Paragraph-level view of an edit: which paragraphs were replaced by how many new ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphModification<PS, S> {
    /// Index of the first affected paragraph.
    pub from: usize,
    /// Paragraphs that were replaced, as they were before the edit.
    pub removed: Vec<Paragraph<PS, S>>,
    /// Number of paragraphs that took their place.
    pub added_len: usize,
}

impl<PS, S> ParagraphModification<PS, S> {
    /// Number of removed paragraphs.
    pub fn removed_len(&self) -> usize {
        self.removed.len()
    }

    /// End (exclusive) of the added paragraphs in the new document.
    pub fn to(&self) -> usize {
        self.from + self.added_len
    }

    /// Change in paragraph count.
    pub fn net_length(&self) -> isize {
        self.added_len as isize - self.removed.len() as isize
    }
}
