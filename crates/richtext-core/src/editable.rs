//! The live, observable document.
//!
//! [`EditableDocument`] owns the current [`ReadOnlyDocument`] and replaces it wholesale on every
//! edit. Subscribers are notified synchronously, exactly once per logical edit, and only after
//! the new version is in place: a notification never observes a half-applied edit.
//!
//! # Batching
//!
//! Several edits can be grouped into one notification either with
//! [`begin_batch`](EditableDocument::begin_batch) / [`end_batch`](EditableDocument::end_batch)
//! (or the [`batch`](EditableDocument::batch) helper), or by queueing them on a
//! [`MultiChangeBuilder`] and committing it.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use richtext_core::EditableDocument;
//!
//! let mut doc = EditableDocument::new((), "plain");
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! doc.subscribe(move |change| {
//!     sink.lock().unwrap().extend(change.plain_changes());
//! });
//!
//! doc.replace_text(0, 0, "ab\ncd").unwrap();
//! assert_eq!(doc.text(), "ab\ncd");
//! assert_eq!(doc.paragraph_count(), 2);
//!
//! let seen = seen.lock().unwrap();
//! assert_eq!(seen.len(), 1);
//! assert_eq!(seen[0].inserted(), "ab\ncd");
//! ```

use crate::change::{ParagraphModification, PlainTextChange, RichTextChange};
use crate::config::{DocumentConfig, InsertionStyle};
use crate::document::ReadOnlyDocument;
use crate::error::{DocumentError, check_paragraph, check_range};
use crate::multi_change::{MultiChangeBuilder, Replacement};
use crate::navigator::{Bias, Position};
use crate::paragraph::Paragraph;
use crate::style_spans::StyleSpans;
use std::cell::OnceCell;

/// Notification sent to subscribers after a logical edit.
#[derive(Debug, Clone)]
pub struct DocumentChange<PS, S> {
    /// Version before the edit.
    pub old_version: u64,
    /// Version after the edit.
    pub new_version: u64,
    /// Change records in the order they were applied.
    pub changes: Vec<RichTextChange<PS, S>>,
    /// Paragraph-level modifications, one per change record.
    pub paragraph_changes: Vec<ParagraphModification<PS, S>>,
    /// The document after the edit.
    pub snapshot: ReadOnlyDocument<PS, S>,
}

impl<PS: Clone + PartialEq, S: Clone + PartialEq> DocumentChange<PS, S> {
    /// Text changes, leaving out pure style changes.
    pub fn plain_changes(&self) -> Vec<PlainTextChange> {
        self.changes
            .iter()
            .filter(|c| !c.is_plain_text_identity())
            .map(|c| c.to_plain())
            .collect()
    }

    /// Returns `true` if no change touched the text.
    pub fn is_style_only(&self) -> bool {
        self.changes.iter().all(|c| c.is_plain_text_identity())
    }
}

/// Subscriber callback type.
pub type DocumentChangeCallback<PS, S> = Box<dyn FnMut(&DocumentChange<PS, S>) + Send>;

/// Handle returned by [`EditableDocument::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The mutable document.
///
/// `PS` is the paragraph style type, `S` the text style type. Both are opaque to the document:
/// only equality and cloning are required.
pub struct EditableDocument<PS, S> {
    doc: ReadOnlyDocument<PS, S>,
    config: DocumentConfig,
    initial_paragraph_style: PS,
    initial_style: S,
    /// Length maintained incrementally from change records.
    length: usize,
    /// Full text, computed on first read after an edit.
    text: OnceCell<String>,
    version: u64,
    callbacks: Vec<(SubscriptionId, DocumentChangeCallback<PS, S>)>,
    next_subscription: u64,
    batch_depth: usize,
    pending_changes: Vec<RichTextChange<PS, S>>,
    pending_paragraph_changes: Vec<ParagraphModification<PS, S>>,
}

impl<PS: Clone + PartialEq, S: Clone + PartialEq> EditableDocument<PS, S> {
    /// A document holding one empty paragraph, with the default configuration.
    pub fn new(initial_paragraph_style: PS, initial_style: S) -> Self {
        Self::with_config(initial_paragraph_style, initial_style, DocumentConfig::default())
    }

    /// A document holding one empty paragraph.
    pub fn with_config(initial_paragraph_style: PS, initial_style: S, config: DocumentConfig) -> Self {
        let doc = ReadOnlyDocument::empty(initial_paragraph_style.clone(), initial_style.clone());
        Self::from_document(doc, initial_paragraph_style, initial_style, config)
    }

    /// A document initialized with `text` in the initial styles.
    pub fn from_text(text: &str, initial_paragraph_style: PS, initial_style: S) -> Self {
        let doc =
            ReadOnlyDocument::from_text(text, initial_paragraph_style.clone(), initial_style.clone());
        Self::from_document(doc, initial_paragraph_style, initial_style, DocumentConfig::default())
    }

    /// Wrap an existing document.
    pub fn from_document(
        doc: ReadOnlyDocument<PS, S>,
        initial_paragraph_style: PS,
        initial_style: S,
        config: DocumentConfig,
    ) -> Self {
        Self {
            length: doc.length(),
            doc,
            config,
            initial_paragraph_style,
            initial_style,
            text: OnceCell::new(),
            version: 0,
            callbacks: Vec::new(),
            next_subscription: 0,
            batch_depth: 0,
            pending_changes: Vec::new(),
            pending_paragraph_changes: Vec::new(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Replace the configuration; affects subsequent edits only.
    pub fn set_config(&mut self, config: DocumentConfig) {
        self.config = config;
    }

    /// Style pinned at construction.
    pub fn initial_style(&self) -> &S {
        &self.initial_style
    }

    /// Paragraph style pinned at construction.
    pub fn initial_paragraph_style(&self) -> &PS {
        &self.initial_paragraph_style
    }

    /// The current version as an immutable document.
    pub fn document(&self) -> &ReadOnlyDocument<PS, S> {
        &self.doc
    }

    /// A cheap, independent snapshot of the current version.
    pub fn snapshot(&self) -> ReadOnlyDocument<PS, S> {
        self.doc.clone()
    }

    /// Number of notified edits so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns `true` if an edit has been notified after `version`.
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.version > version
    }

    /// Length in characters, terminators included.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Full text; computed lazily and cached until the next edit.
    pub fn text(&self) -> &str {
        self.text.get_or_init(|| self.doc.text())
    }

    /// Text of `[start, end)`.
    pub fn text_range(&self, start: usize, end: usize) -> Result<String, DocumentError> {
        self.doc.text_range(start, end)
    }

    /// Number of paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.doc.paragraph_count()
    }

    /// Paragraph at `index`.
    pub fn paragraph(&self, index: usize) -> Result<&Paragraph<PS, S>, DocumentError> {
        self.doc.paragraph(index)
    }

    /// All paragraphs in order.
    pub fn paragraphs(&self) -> impl ExactSizeIterator<Item = &Paragraph<PS, S>> + '_ {
        self.doc.paragraphs()
    }

    /// See [`ReadOnlyDocument::offset_to_position`].
    pub fn offset_to_position(&self, offset: usize, bias: Bias) -> Result<Position, DocumentError> {
        self.doc.offset_to_position(offset, bias)
    }

    /// See [`ReadOnlyDocument::position_to_offset`].
    pub fn position_to_offset(&self, position: Position) -> Result<usize, DocumentError> {
        self.doc.position_to_offset(position)
    }

    /// Style spans over `[from, to)`.
    pub fn style_spans(&self, from: usize, to: usize) -> Result<StyleSpans<S>, DocumentError> {
        self.doc.style_spans(from, to)
    }

    /// Style of the character before `offset`.
    pub fn style_at_position(&self, offset: usize) -> Result<&S, DocumentError> {
        self.doc.style_at_position(offset)
    }

    /// Register a callback run after every logical edit.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&DocumentChange<PS, S>) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    /// Build a document for `text` inserted at `offset`, styled according to `style` and the
    /// configured paragraph style policy.
    pub(crate) fn styled_text(
        &self,
        offset: usize,
        text: &str,
        style: &InsertionStyle<S>,
    ) -> Result<ReadOnlyDocument<PS, S>, DocumentError> {
        let text_style = style.resolve(&self.initial_style, self.doc.style_at_position(offset)?);
        let paragraph_style = self
            .config
            .paragraph_insertion_style()
            .resolve(&self.initial_paragraph_style, self.doc.paragraph_style_at(offset)?);
        Ok(ReadOnlyDocument::from_text(text, paragraph_style, text_style))
    }

    /// Replace `[start, end)` with `text`, styled according to the configuration.
    pub fn replace_text(&mut self, start: usize, end: usize, text: &str) -> Result<(), DocumentError> {
        let style = self.config.text_insertion_style();
        self.replace_text_with_style(start, end, text, style)
    }

    /// Replace `[start, end)` with `text`, styled according to `style`.
    pub fn replace_text_with_style(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
        style: InsertionStyle<S>,
    ) -> Result<(), DocumentError> {
        check_range(start, end, self.length)?;
        let replacement = self.styled_text(start, text, &style)?;
        self.replace(start, end, &replacement)
    }

    /// Insert `text` at `offset`.
    pub fn insert_text(&mut self, offset: usize, text: &str) -> Result<(), DocumentError> {
        self.replace_text(offset, offset, text)
    }

    /// Delete `[start, end)`.
    pub fn delete_text(&mut self, start: usize, end: usize) -> Result<(), DocumentError> {
        self.replace_text(start, end, "")
    }

    /// Replace `[start, end)` with a styled document.
    pub fn replace(
        &mut self,
        start: usize,
        end: usize,
        replacement: &ReadOnlyDocument<PS, S>,
    ) -> Result<(), DocumentError> {
        let (doc, change, modification) = self.doc.replace(start, end, replacement)?;
        self.apply(doc, vec![change], vec![modification]);
        Ok(())
    }

    /// Apply several replacements as one logical edit.
    ///
    /// Each replacement is expressed against the document produced by the previous ones. If any
    /// of them fails the document is left untouched and nothing is notified.
    pub fn replace_multi(&mut self, replacements: &[Replacement<PS, S>]) -> Result<(), DocumentError> {
        if replacements.is_empty() {
            return Ok(());
        }
        let mut doc = self.doc.clone();
        let mut changes = Vec::with_capacity(replacements.len());
        let mut modifications = Vec::with_capacity(replacements.len());
        for r in replacements {
            let (next, change, modification) = doc.replace(r.start, r.end, &r.replacement)?;
            doc = next;
            changes.push(change);
            modifications.push(modification);
        }
        tracing::debug!(
            edits = replacements.len(),
            length = doc.length(),
            "applied multi-change"
        );
        self.apply(doc, changes, modifications);
        Ok(())
    }

    /// Give `[from, to)` the style `style`.
    pub fn set_style(&mut self, from: usize, to: usize, style: S) -> Result<(), DocumentError> {
        let (doc, change, modification) = self.doc.replace_with(from, to, |removed| {
            removed.map_paragraphs(|p| p.restyle(style.clone()))
        })?;
        self.apply(doc, vec![change], vec![modification]);
        Ok(())
    }

    /// Give the whole text of paragraph `paragraph` the style `style`.
    pub fn set_style_of_paragraph(&mut self, paragraph: usize, style: S) -> Result<(), DocumentError> {
        let (doc, change, modification) = self
            .doc
            .replace_paragraph(paragraph, |p| p.restyle(style))?;
        self.apply(doc, vec![change], vec![modification]);
        Ok(())
    }

    /// Give columns `[from, to)` of paragraph `paragraph` the style `style`.
    pub fn set_style_in_paragraph(
        &mut self,
        paragraph: usize,
        from: usize,
        to: usize,
        style: S,
    ) -> Result<(), DocumentError> {
        self.check_columns(paragraph, from, to)?;
        let (doc, change, modification) = self
            .doc
            .replace_paragraph(paragraph, |p| p.restyle_range(from, to, style))?;
        self.apply(doc, vec![change], vec![modification]);
        Ok(())
    }

    /// Apply `spans` starting at offset `from`.
    ///
    /// Span characters that fall on line terminators are skipped. Nothing happens, and nothing is
    /// notified, when the spans cover no text at all.
    pub fn set_style_spans(&mut self, from: usize, spans: &StyleSpans<S>) -> Result<(), DocumentError> {
        let to = from.saturating_add(spans.length());
        check_range(from, to, self.length)?;
        if self.doc.sub_document(from, to)?.char_count() == 0 {
            return Ok(());
        }
        let (doc, change, modification) = self.doc.replace_with(from, to, |removed| {
            let mut offset = 0;
            removed.map_paragraphs(|p| {
                let part = spans.sub_view(offset, offset + p.length());
                offset += p.full_length();
                p.restyle_spans(0, &part)
            })
        })?;
        self.apply(doc, vec![change], vec![modification]);
        Ok(())
    }

    /// Apply `spans` starting at column `from` of paragraph `paragraph`.
    pub fn set_style_spans_in_paragraph(
        &mut self,
        paragraph: usize,
        from: usize,
        spans: &StyleSpans<S>,
    ) -> Result<(), DocumentError> {
        self.check_columns(paragraph, from, from.saturating_add(spans.length()))?;
        if spans.length() == 0 {
            return Ok(());
        }
        let (doc, change, modification) = self
            .doc
            .replace_paragraph(paragraph, |p| p.restyle_spans(from, spans))?;
        self.apply(doc, vec![change], vec![modification]);
        Ok(())
    }

    /// Set the paragraph style of paragraph `paragraph`.
    pub fn set_paragraph_style(&mut self, paragraph: usize, paragraph_style: PS) -> Result<(), DocumentError> {
        let (doc, change, modification) = self
            .doc
            .replace_paragraph(paragraph, |p| p.set_paragraph_style(paragraph_style))?;
        self.apply(doc, vec![change], vec![modification]);
        Ok(())
    }

    fn check_columns(&self, paragraph: usize, from: usize, to: usize) -> Result<(), DocumentError> {
        check_paragraph(paragraph, self.paragraph_count())?;
        let length = self.doc.paragraph(paragraph)?.length();
        if to > length {
            return Err(DocumentError::InvalidColumn {
                paragraph,
                column: to,
                length,
            });
        }
        if from > to {
            return Err(DocumentError::InvalidRange {
                start: from,
                end: to,
                length,
            });
        }
        Ok(())
    }

    /// Start a batch: notifications are held back until the matching
    /// [`end_batch`](Self::end_batch). Batches nest.
    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// End a batch, sending one notification for everything applied since the outermost
    /// [`begin_batch`](Self::begin_batch).
    pub fn end_batch(&mut self) {
        if self.batch_depth == 0 {
            tracing::warn!("end_batch called without a matching begin_batch");
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 && !self.pending_changes.is_empty() {
            let changes = std::mem::take(&mut self.pending_changes);
            let modifications = std::mem::take(&mut self.pending_paragraph_changes);
            self.notify(changes, modifications);
        }
    }

    /// Run `f` inside a batch.
    ///
    /// Edits applied by `f` before it fails stay applied; the batch only merges notifications.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_batch();
        let result = f(self);
        self.end_batch();
        result
    }

    /// Queue several edits and apply them as one. See [`MultiChangeBuilder`].
    pub fn create_multi_change(&mut self, capacity: usize) -> MultiChangeBuilder<'_, PS, S> {
        MultiChangeBuilder::new(self, capacity)
    }

    fn apply(
        &mut self,
        doc: ReadOnlyDocument<PS, S>,
        changes: Vec<RichTextChange<PS, S>>,
        modifications: Vec<ParagraphModification<PS, S>>,
    ) {
        let length = changes
            .iter()
            .fold(self.length, |len, c| len - c.removed_length() + c.inserted_length());
        debug_assert_eq!(length, doc.length());

        self.doc = doc;
        self.length = length;
        self.text = OnceCell::new();

        if self.batch_depth > 0 {
            self.pending_changes.extend(changes);
            self.pending_paragraph_changes.extend(modifications);
        } else {
            self.notify(changes, modifications);
        }
    }

    fn notify(
        &mut self,
        changes: Vec<RichTextChange<PS, S>>,
        paragraph_changes: Vec<ParagraphModification<PS, S>>,
    ) {
        let old_version = self.version;
        self.version += 1;
        let change = DocumentChange {
            old_version,
            new_version: self.version,
            changes,
            paragraph_changes,
            snapshot: self.doc.clone(),
        };
        tracing::debug!(
            old_version,
            new_version = self.version,
            changes = change.changes.len(),
            subscribers = self.callbacks.len(),
            "document changed"
        );
        for (_, callback) in &mut self.callbacks {
            callback(&change);
        }
    }
}
