#![warn(missing_docs)]
//! Richtext Core - Headless Rich-Text Document Model
//!
//! # Overview
//!
//! `richtext-core` is the content model of a rich-text editor: styled paragraphs kept in a
//! persistent tree, position translation between flat offsets and `(paragraph, column)` pairs,
//! and an edit pipeline that produces reversible change records. Rendering, carets, input and
//! undo policy live elsewhere; they consume the change records produced here.
//!
//! Styles are opaque: a document is generic over a paragraph style `PS` and a text style `S`,
//! and only needs to clone and compare them.
//!
//! # Core Features
//!
//! - **Persistent Documents**: balanced paragraph tree with structural sharing, O(log n) edits
//! - **Style Runs**: run-length style spans with builder, overlay and sub-views
//! - **Position Translation**: offset ↔ `(major, minor)` with explicit [`Bias`] at boundaries
//! - **Line Terminators**: LF, CR and CRLF kept as content, CR/LF pairs re-fused after edits
//! - **Change Records**: invertible, mergeable plain and rich change records
//! - **Batching**: nested batches and a multi-change builder, one notification per logical edit
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  EditableDocument + MultiChangeBuilder      │  ← Public API, notifications
//! ├─────────────────────────────────────────────┤
//! │  Change Records (TextChange, Modification)  │  ← Undo / observers
//! ├─────────────────────────────────────────────┤
//! │  ReadOnlyDocument (replace, split, concat)  │  ← Immutable snapshots
//! ├─────────────────────────────────────────────┤
//! │  Paragraph Tree (persistent, balanced)      │  ← O(log n) access
//! ├─────────────────────────────────────────────┤
//! │  Paragraph / StyledSegment / StyleSpans     │  ← Styled text
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Editing
//!
//! ```rust
//! use richtext_core::{Bias, EditableDocument, Position};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Style {
//!     Plain,
//!     Bold,
//! }
//!
//! let mut doc = EditableDocument::new((), Style::Plain);
//! doc.insert_text(0, "Hello\nworld").unwrap();
//! doc.set_style(0, 5, Style::Bold).unwrap();
//!
//! assert_eq!(doc.paragraph_count(), 2);
//! assert_eq!(doc.offset_to_position(6, Bias::Forward).unwrap(), Position::new(1, 0));
//! assert_eq!(doc.style_at_position(5).unwrap(), &Style::Bold);
//! ```
//!
//! ## Observing Changes
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use richtext_core::EditableDocument;
//!
//! let mut doc = EditableDocument::from_text("(text)", (), ());
//! let versions = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&versions);
//! doc.subscribe(move |change| {
//!     sink.lock().unwrap().push((change.old_version, change.new_version));
//! });
//!
//! let mut builder = doc.create_multi_change(2);
//! builder.delete_text(0, 1).delete_text(5, 6);
//! builder.commit().unwrap();
//!
//! assert_eq!(doc.text(), "text");
//! assert_eq!(*versions.lock().unwrap(), vec![(0, 1)]);
//! ```
//!
//! # Module Description
//!
//! - [`document`] - Immutable documents and the replace algorithm
//! - [`paragraph`] - Styled paragraphs and paragraph-level surgery
//! - [`segment`] - Text runs with a single style
//! - [`style_spans`] - Run-length style sequences
//! - [`navigator`] - Two-level offset/position translation
//! - [`line_terminator`] - LF / CR / CRLF handling
//! - [`change`] - Change records
//! - [`editable`] - The live document and its notifications
//! - [`multi_change`] - Batched edits
//! - [`config`] - Insertion style configuration
//! - [`error`] - Error type
//!
//! # Units
//!
//! Offsets count Unicode scalar values (`char`). Line terminators are part of the content, so a
//! CRLF occupies two offsets.

pub mod change;
pub mod config;
pub mod document;
pub mod editable;
pub mod error;
pub mod line_terminator;
pub mod multi_change;
pub mod navigator;
pub mod paragraph;
pub mod segment;
pub mod style_spans;
mod text;
mod tree;

pub use change::{
    ChangeContent, ChangeKind, ParagraphModification, PlainTextChange, RichTextChange, TextChange,
};
pub use config::{DocumentConfig, InsertionStyle};
pub use document::{ReadOnlyDocument, Replaced};
pub use editable::{DocumentChange, DocumentChangeCallback, EditableDocument, SubscriptionId};
pub use error::DocumentError;
pub use line_terminator::LineTerminator;
pub use multi_change::{MultiChangeBuilder, Replacement};
pub use navigator::{Bias, Position, TwoLevelNavigator};
pub use paragraph::Paragraph;
pub use segment::StyledSegment;
pub use style_spans::{StyleSpan, StyleSpans, StyleSpansBuilder};
