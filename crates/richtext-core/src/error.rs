//! Error type shared by every fallible document operation.
//!
//! Errors fall into two families:
//!
//! - **range errors**: an offset, range, paragraph index or column lies outside the document
//!   the call was made against;
//! - **contract violations**: the arguments are in range but break an API contract
//!   (overlaying spans of different lengths, committing a builder twice, ...).
//!
//! Both are raised before anything is mutated, so a failed call leaves the document untouched.

use thiserror::Error;

/// Error returned by document, paragraph and style span operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Offset outside `0..=length`.
    #[error("Invalid offset: {offset} (document length {length})")]
    InvalidOffset {
        /// Offending character offset.
        offset: usize,
        /// Length of the document at the time of the call.
        length: usize,
    },
    /// Range with `start > end` or `end > length`.
    #[error("Invalid range: {start}..{end} (document length {length})")]
    InvalidRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
        /// Length of the document at the time of the call.
        length: usize,
    },
    /// Paragraph index outside `0..count`.
    #[error("Invalid paragraph index: {index} (paragraph count {count})")]
    InvalidParagraph {
        /// Offending paragraph index.
        index: usize,
        /// Number of paragraphs in the document.
        count: usize,
    },
    /// Column outside the paragraph it was given for.
    #[error("Invalid column {column} in paragraph {paragraph} (full length {length})")]
    InvalidColumn {
        /// Paragraph index.
        paragraph: usize,
        /// Offending column.
        column: usize,
        /// Full length of the paragraph, terminator included.
        length: usize,
    },
    /// Two style span sequences that must cover the same length do not.
    #[error("Style span lengths differ: {left} vs {right}")]
    SpanLengthMismatch {
        /// Length of the receiver.
        left: usize,
        /// Length of the argument.
        right: usize,
    },
    /// A style span sequence was created without any span.
    #[error("No style spans have been added")]
    EmptySpans,
    /// A paragraph was created without any segment.
    #[error("A paragraph needs at least one segment")]
    EmptyParagraph,
    /// A document was created without any paragraph.
    #[error("A document needs at least one paragraph")]
    EmptyDocument,
    /// A multi-change builder was committed a second time.
    #[error("Multi-change builder has already been committed")]
    AlreadyCommitted,
    /// A multi-change builder was committed with nothing queued.
    #[error("Multi-change builder has no queued changes")]
    EmptyBatch,
    /// Configuration could not be parsed.
    #[error("Invalid document configuration: {0}")]
    InvalidConfig(String),
}

impl DocumentError {
    /// Returns `true` for errors caused by out-of-range offsets, ranges, paragraphs or columns.
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidOffset { .. }
                | Self::InvalidRange { .. }
                | Self::InvalidParagraph { .. }
                | Self::InvalidColumn { .. }
        )
    }

    /// Returns `true` for errors caused by breaking an API contract.
    pub fn is_contract_violation(&self) -> bool {
        !self.is_range_error()
    }
}

pub(crate) fn check_offset(offset: usize, length: usize) -> Result<(), DocumentError> {
    if offset > length {
        return Err(DocumentError::InvalidOffset { offset, length });
    }
    Ok(())
}

pub(crate) fn check_range(start: usize, end: usize, length: usize) -> Result<(), DocumentError> {
    if start > end || end > length {
        tracing::warn!(start, end, length, "rejected out-of-range edit");
        return Err(DocumentError::InvalidRange { start, end, length });
    }
    Ok(())
}

pub(crate) fn check_paragraph(index: usize, count: usize) -> Result<(), DocumentError> {
    if index >= count {
        return Err(DocumentError::InvalidParagraph { index, count });
    }
    Ok(())
}
