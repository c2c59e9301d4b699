//! Line terminator helpers.
//!
//! Unlike a plain-text buffer that normalizes newlines on load, a rich-text document keeps the
//! exact terminator of every paragraph. Terminator characters count towards document offsets, so
//! an edit may split a CRLF in two: trimming it at 1 leaves [`LineTerminator::Cr`] and the
//! remainder is [`LineTerminator::Lf`].

use serde::{Deserialize, Serialize};

/// The terminator that ends a paragraph.
///
/// Every paragraph of a document except the last one carries a terminator; the last one is
/// always [`LineTerminator::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LineTerminator {
    /// Not terminated (last paragraph, or a fragment that can still be extended).
    #[default]
    None,
    /// Unix-style LF (`'\n'`).
    Lf,
    /// Classic Mac CR (`'\r'`).
    Cr,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
}

impl LineTerminator {
    /// Parse a terminator from its exact textual form.
    pub fn from_str_exact(s: &str) -> Option<Self> {
        match s {
            "" => Some(Self::None),
            "\n" => Some(Self::Lf),
            "\r" => Some(Self::Cr),
            "\r\n" => Some(Self::Crlf),
            _ => None,
        }
    }

    /// Textual form of the terminator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Lf => "\n",
            Self::Cr => "\r",
            Self::Crlf => "\r\n",
        }
    }

    /// Number of characters the terminator occupies (0, 1 or 2).
    pub fn len(self) -> usize {
        self.as_str().len()
    }

    /// Returns `true` for [`LineTerminator::None`].
    pub fn is_none(self) -> bool {
        self == Self::None
    }

    /// Returns `true` if the terminator occupies no characters.
    pub fn is_empty(self) -> bool {
        self.is_none()
    }

    /// Keep the first `length` characters of the terminator.
    pub fn trim(self, length: usize) -> Self {
        let s = self.as_str();
        Self::from_str_exact(&s[..length.min(s.len())]).unwrap_or(self)
    }

    /// Drop the first `start` characters of the terminator.
    pub fn sub_sequence(self, start: usize) -> Self {
        let s = self.as_str();
        Self::from_str_exact(&s[start.min(s.len())..]).unwrap_or(Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths() {
        assert_eq!(LineTerminator::None.len(), 0);
        assert_eq!(LineTerminator::Lf.len(), 1);
        assert_eq!(LineTerminator::Cr.len(), 1);
        assert_eq!(LineTerminator::Crlf.len(), 2);
    }

    #[test]
    fn test_trim_and_sub_sequence_split_crlf() {
        assert_eq!(LineTerminator::Crlf.trim(1), LineTerminator::Cr);
        assert_eq!(LineTerminator::Crlf.sub_sequence(1), LineTerminator::Lf);
        assert_eq!(LineTerminator::Crlf.trim(0), LineTerminator::None);
        assert_eq!(LineTerminator::Crlf.sub_sequence(2), LineTerminator::None);
        assert_eq!(LineTerminator::Lf.trim(5), LineTerminator::Lf);
    }
}
