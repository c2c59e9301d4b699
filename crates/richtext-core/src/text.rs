use crate::line_terminator::LineTerminator;
use regex::Regex;
use std::sync::LazyLock;

static LINE_TERMINATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("static pattern"));

/// Split `text` into `(line, terminator)` pairs.
///
/// N terminators always produce N+1 lines; the last line carries [`LineTerminator::None`]
/// and may be empty.
pub(crate) fn split_paragraphs(text: &str) -> Vec<(&str, LineTerminator)> {
    let mut lines = Vec::new();
    let mut start = 0;
    for m in LINE_TERMINATOR.find_iter(text) {
        let terminator = LineTerminator::from_str_exact(m.as_str()).unwrap_or(LineTerminator::Lf);
        lines.push((&text[start..m.start()], terminator));
        start = m.end();
    }
    lines.push((&text[start..], LineTerminator::None));
    lines
}

/// Number of `char`s in `text`.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the `char_idx`-th character, or `text.len()` past the end.
pub(crate) fn byte_index(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Slice `text` by character offsets; offsets past the end are clamped.
pub(crate) fn char_slice(text: &str, from: usize, to: usize) -> &str {
    let start = byte_index(text, from);
    let end = byte_index(text, to.max(from));
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_preserves_trailing_line() {
        let lines = split_paragraphs("a\nb\n");
        assert_eq!(
            lines,
            vec![
                ("a", LineTerminator::Lf),
                ("b", LineTerminator::Lf),
                ("", LineTerminator::None),
            ]
        );
    }

    #[test]
    fn test_split_mixed_terminators() {
        let lines = split_paragraphs("a\r\nb\rc");
        assert_eq!(
            lines,
            vec![
                ("a", LineTerminator::Crlf),
                ("b", LineTerminator::Cr),
                ("c", LineTerminator::None),
            ]
        );
        assert_eq!(split_paragraphs(""), vec![("", LineTerminator::None)]);
    }

    #[test]
    fn test_char_slice_multibyte() {
        assert_eq!(char_slice("你好世界", 1, 3), "好世");
        assert_eq!(char_slice("abc", 2, 10), "c");
        assert_eq!(char_len("héllo"), 5);
    }
}
