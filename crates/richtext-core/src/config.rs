//! Document configuration.
//!
//! [`DocumentConfig`] selects how inserted text is styled when the caller does not say so
//! explicitly. It can be built in code or loaded from JSON:
//!
//! ```rust
//! use richtext_core::DocumentConfig;
//!
//! let config = DocumentConfig::from_json(r#"{ "use_initial_style_for_insertion": true }"#).unwrap();
//! assert!(config.use_initial_style_for_insertion);
//! assert!(!config.use_initial_paragraph_style_for_insertion);
//! ```

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};

/// Insertion style policy of an [`EditableDocument`](crate::EditableDocument).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Style inserted text with the document's initial style instead of the style preceding
    /// the insertion point.
    pub use_initial_style_for_insertion: bool,
    /// Give inserted paragraphs the document's initial paragraph style instead of the style of
    /// the paragraph the insertion happens in.
    pub use_initial_paragraph_style_for_insertion: bool,
}

impl DocumentConfig {
    /// Parse a JSON object; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(json).map_err(|e| DocumentError::InvalidConfig(e.to_string()))
    }

    /// Serialize to a JSON object.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string(self).map_err(|e| DocumentError::InvalidConfig(e.to_string()))
    }

    /// Text style policy implied by this configuration.
    pub fn text_insertion_style<S>(&self) -> InsertionStyle<S> {
        if self.use_initial_style_for_insertion {
            InsertionStyle::Initial
        } else {
            InsertionStyle::Preceding
        }
    }

    /// Paragraph style policy implied by this configuration.
    pub fn paragraph_insertion_style<PS>(&self) -> InsertionStyle<PS> {
        if self.use_initial_paragraph_style_for_insertion {
            InsertionStyle::Initial
        } else {
            InsertionStyle::Preceding
        }
    }
}

/// Where the style of newly inserted text comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum InsertionStyle<S> {
    /// The document's initial style.
    Initial,
    /// The style found right before the insertion point.
    #[default]
    Preceding,
    /// A style chosen by the caller.
    Explicit(S),
}

impl<S: Clone> InsertionStyle<S> {
    /// Resolve the policy against the initial and preceding styles.
    pub fn resolve(&self, initial: &S, preceding: &S) -> S {
        match self {
            InsertionStyle::Initial => initial.clone(),
            InsertionStyle::Preceding => preceding.clone(),
            InsertionStyle::Explicit(style) => style.clone(),
        }
    }
}
