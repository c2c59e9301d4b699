//! Immutable rich-text documents.
//!
//! A [`ReadOnlyDocument`] is a persistent, balanced tree of [`Paragraph`]s. Every operation that
//! looks like a mutation returns a new document and leaves the receiver valid; unchanged subtrees
//! are shared between the two, so keeping old versions around (undo history, snapshots handed to
//! observers) costs only the nodes on the edited path.
//!
//! # Structure
//!
//! Documents are always well formed:
//!
//! - there is at least one paragraph;
//! - every paragraph except the last carries a line terminator, the last one carries none;
//! - a CR-terminated paragraph is never followed by an empty LF-terminated one (that pair is
//!   stored as a single CRLF).
//!
//! The paragraph structure of a document is therefore exactly what parsing its
//! [`text`](ReadOnlyDocument::text) would produce. Terminators count as content:
//! [`length`](ReadOnlyDocument::length) is the sum of the paragraphs'
//! [`full_length`](Paragraph::full_length).
//!
//! # Example
//!
//! ```rust
//! use richtext_core::{Bias, Position, ReadOnlyDocument};
//!
//! let doc = ReadOnlyDocument::from_text("ab\ncd", (), 0u8);
//! assert_eq!(doc.paragraph_count(), 2);
//! assert_eq!(doc.length(), 5);
//! assert_eq!(doc.offset_to_position(3, Bias::Forward).unwrap(), Position::new(1, 0));
//!
//! let (left, right) = doc.split(1).unwrap();
//! assert_eq!(left.text(), "a");
//! assert_eq!(left.concat(&right), doc);
//! ```

use crate::change::{ParagraphModification, RichTextChange, TextChange};
use crate::error::{DocumentError, check_offset, check_paragraph, check_range};
use crate::line_terminator::LineTerminator;
use crate::navigator::{Bias, Position};
use crate::paragraph::Paragraph;
use crate::segment::StyledSegment;
use crate::style_spans::{StyleSpans, StyleSpansBuilder};
use crate::text::split_paragraphs;
use crate::tree::Tree;
use std::fmt;

/// Result of [`ReadOnlyDocument::replace`]: the new document, the change record and the
/// paragraph-level modification.
pub type Replaced<PS, S> = (
    ReadOnlyDocument<PS, S>,
    RichTextChange<PS, S>,
    ParagraphModification<PS, S>,
);

/// An immutable, structurally shared sequence of paragraphs.
pub struct ReadOnlyDocument<PS, S> {
    tree: Tree<PS, S>,
}

impl<PS, S> Clone for ReadOnlyDocument<PS, S> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<PS: Clone + PartialEq, S: Clone + PartialEq> ReadOnlyDocument<PS, S> {
    /// A document holding one empty paragraph.
    pub fn empty(paragraph_style: PS, style: S) -> Self {
        Self {
            tree: Tree::single(Paragraph::empty(paragraph_style, style)),
        }
    }

    /// Parse `text` into paragraphs, splitting on `\r\n`, `\r` and `\n`.
    ///
    /// Every paragraph gets `paragraph_style` and all text gets `style`.
    pub fn from_text(text: &str, paragraph_style: PS, style: S) -> Self {
        let paragraphs: Vec<_> = split_paragraphs(text)
            .into_iter()
            .map(|(line, terminator)| {
                Paragraph::new(paragraph_style.clone(), line, style.clone())
                    .into_terminated(terminator)
            })
            .collect();
        match Tree::from_paragraphs(paragraphs) {
            Some(tree) => Self { tree },
            None => Self::empty(paragraph_style, style),
        }
    }

    /// A document made of a single segment; its text is split on line terminators.
    pub fn from_segment(segment: StyledSegment<S>, paragraph_style: PS) -> Self {
        let (text, style) = segment.into_parts();
        Self::from_text(&text, paragraph_style, style)
    }

    /// Rebuild a document from paragraphs.
    ///
    /// Unterminated paragraphs fuse with their successor and a trailing empty paragraph is
    /// appended if the last one is terminated, so any list yields a well-formed document.
    pub fn from_paragraphs<I>(paragraphs: I) -> Result<Self, DocumentError>
    where
        I: IntoIterator<Item = Paragraph<PS, S>>,
    {
        let mut list = Vec::new();
        for paragraph in paragraphs {
            push_joined(&mut list, paragraph, false);
        }
        close(&mut list);
        Self::from_list(list)
    }

    fn from_list(list: Vec<Paragraph<PS, S>>) -> Result<Self, DocumentError> {
        Tree::from_paragraphs(list)
            .map(|tree| Self { tree })
            .ok_or(DocumentError::EmptyDocument)
    }

    fn from_tree(tree: Option<Tree<PS, S>>) -> Result<Self, DocumentError> {
        tree.map(|tree| Self { tree })
            .ok_or(DocumentError::EmptyDocument)
    }

    /// Length in characters, terminators included. O(1).
    pub fn length(&self) -> usize {
        self.tree.length()
    }

    /// Characters of text, terminators excluded. O(1).
    pub fn char_count(&self) -> usize {
        self.tree.summary().char_count
    }

    /// Number of paragraphs; always at least one. O(1).
    pub fn paragraph_count(&self) -> usize {
        self.tree.paragraph_count()
    }

    /// Paragraph at `index`. O(log n).
    pub fn paragraph(&self, index: usize) -> Result<&Paragraph<PS, S>, DocumentError> {
        self.tree.get(index).ok_or(DocumentError::InvalidParagraph {
            index,
            count: self.paragraph_count(),
        })
    }

    /// All paragraphs in order.
    pub fn paragraphs(&self) -> impl ExactSizeIterator<Item = &Paragraph<PS, S>> + '_ {
        self.tree.iter()
    }

    /// Last paragraph (the only unterminated one).
    pub fn last_paragraph(&self) -> &Paragraph<PS, S> {
        self.tree.last()
    }

    /// Full text, terminators included.
    pub fn text(&self) -> String {
        let mut text = String::with_capacity(self.length());
        for paragraph in self.paragraphs() {
            text.push_str(&paragraph.text());
            text.push_str(paragraph.terminator().as_str());
        }
        text
    }

    /// Text of `[start, end)`.
    pub fn text_range(&self, start: usize, end: usize) -> Result<String, DocumentError> {
        Ok(self.sub_document(start, end)?.text())
    }

    /// Returns `true` if both documents share the same tree.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.tree.ptr_eq(&other.tree)
    }

    /// Resolve an offset to `(paragraph, column)`. O(log n).
    ///
    /// At a paragraph boundary [`Bias::Forward`] yields the start of the next paragraph and
    /// [`Bias::Backward`] the end of the previous one, after its terminator.
    pub fn offset_to_position(&self, offset: usize, bias: Bias) -> Result<Position, DocumentError> {
        check_offset(offset, self.length())?;
        Ok(self.tree.locate(offset, bias))
    }

    /// Convert `(paragraph, column)` to an offset. O(log n).
    pub fn position_to_offset(&self, position: Position) -> Result<usize, DocumentError> {
        self.check_position(position)?;
        Ok(self.tree.offset_of(position.major) + position.minor)
    }

    fn check_position(&self, position: Position) -> Result<(), DocumentError> {
        let paragraph = self.paragraph(position.major)?;
        if position.minor > paragraph.full_length() {
            return Err(DocumentError::InvalidColumn {
                paragraph: position.major,
                column: position.minor,
                length: paragraph.full_length(),
            });
        }
        Ok(())
    }

    /// Move a column that sits past a terminator onto the start of the next paragraph.
    fn forward_position(&self, position: Position) -> Position {
        let paragraph = self.tree.at(position.major);
        if position.minor >= paragraph.full_length() && position.major + 1 < self.paragraph_count()
        {
            Position::new(position.major + 1, 0)
        } else {
            position
        }
    }

    /// Split at `offset`: `left.concat(&right)` reproduces this document.
    pub fn split(&self, offset: usize) -> Result<(Self, Self), DocumentError> {
        check_offset(offset, self.length())?;
        self.split_position(self.tree.locate(offset, Bias::Forward))
    }

    /// Split at `(paragraph, column)`.
    pub fn split_at(&self, paragraph: usize, column: usize) -> Result<(Self, Self), DocumentError> {
        let position = Position::new(paragraph, column);
        self.check_position(position)?;
        self.split_position(self.forward_position(position))
    }

    fn split_position(&self, position: Position) -> Result<(Self, Self), DocumentError> {
        let paragraph = self.tree.at(position.major);
        let (head, rest) = self.tree.split(position.major);
        let tail = rest.and_then(|rest| rest.split(1).1);

        let mut left_tail = vec![paragraph.trim(position.minor)];
        close(&mut left_tail);
        let left = Tree::concat_all([head, Tree::from_paragraphs(left_tail)]);
        let right = Tree::concat_all([
            Some(Tree::single(paragraph.sub_sequence(position.minor))),
            tail,
        ]);
        Ok((Self::from_tree(left)?, Self::from_tree(right)?))
    }

    /// Append `other`, fusing this document's last paragraph with `other`'s first one.
    pub fn concat(&self, other: &Self) -> Self {
        // The last two paragraphs take part in the seam: a trailing CR may absorb an LF.
        let keep = self.paragraph_count().saturating_sub(2);
        let (head, seam) = self.tree.split(keep);
        let (first, tail) = other.tree.split(1);

        let mut list: Vec<_> = seam.iter().flat_map(Tree::iter).cloned().collect();
        for paragraph in first.iter().flat_map(Tree::iter) {
            push_joined(&mut list, paragraph.clone(), false);
        }
        if tail.is_none() {
            close(&mut list);
        }
        let tree = Tree::concat_all([head, Tree::from_paragraphs(list), tail]);
        Self::from_tree(tree).unwrap_or_else(|_| self.clone())
    }

    /// The part of the document between `start` and `end`.
    pub fn sub_document(&self, start: usize, end: usize) -> Result<Self, DocumentError> {
        check_range(start, end, self.length())?;
        let s = self.tree.locate(start, Bias::Forward);
        let e = self.tree.locate(end, Bias::Forward);
        self.sub_document_between(s, e)
    }

    fn sub_document_between(&self, s: Position, e: Position) -> Result<Self, DocumentError> {
        if s.major == e.major {
            let mut list = vec![self.tree.at(s.major).sub_sequence_range(s.minor, e.minor)];
            close(&mut list);
            return Self::from_list(list);
        }
        let first = self.tree.at(s.major).sub_sequence(s.minor);
        let middle = self.tree.slice(s.major + 1, e.major);
        let mut last = vec![self.tree.at(e.major).trim(e.minor)];
        close(&mut last);
        Self::from_tree(Tree::concat_all([
            Some(Tree::single(first)),
            middle,
            Tree::from_paragraphs(last),
        ]))
    }

    /// Replace `[start, end)` with `replacement`.
    ///
    /// Returns the new document, the change record (whose removed part is captured from this
    /// document) and the paragraph-level modification. O(log n + k) where k is the number of
    /// paragraphs touched.
    pub fn replace(
        &self,
        start: usize,
        end: usize,
        replacement: &Self,
    ) -> Result<Replaced<PS, S>, DocumentError> {
        self.replace_with(start, end, |_| replacement.clone())
    }

    /// Replace `[start, end)` with `f(removed)`.
    pub fn replace_with<F>(&self, start: usize, end: usize, f: F) -> Result<Replaced<PS, S>, DocumentError>
    where
        F: FnOnce(&Self) -> Self,
    {
        check_range(start, end, self.length())?;
        let s = self.tree.locate(start, Bias::Forward);
        let e = self.tree.locate(end, Bias::Forward);
        self.replace_between(start, s, e, f)
    }

    /// Replace the text of paragraph `index` with `f(text part)`; the terminator is kept.
    pub fn replace_paragraph<F>(&self, index: usize, f: F) -> Result<Replaced<PS, S>, DocumentError>
    where
        F: FnOnce(&Paragraph<PS, S>) -> Paragraph<PS, S>,
    {
        check_paragraph(index, self.paragraph_count())?;
        let length = self.tree.at(index).length();
        let start = self.tree.offset_of(index);
        self.replace_between(
            start,
            Position::new(index, 0),
            Position::new(index, length),
            |removed| {
                let mapped = f(removed.tree.first());
                Self::from_paragraphs([mapped]).unwrap_or_else(|_| removed.clone())
            },
        )
    }

    fn replace_between<F>(
        &self,
        offset: usize,
        s: Position,
        e: Position,
        f: F,
    ) -> Result<Replaced<PS, S>, DocumentError>
    where
        F: FnOnce(&Self) -> Self,
    {
        let removed = self.sub_document_between(s, e)?;
        let replacement = f(&removed);

        let mut joined = Vec::with_capacity(replacement.paragraph_count() + 2);
        joined.push(self.tree.at(s.major).trim(s.minor));
        let mut inserted = replacement.paragraphs();
        if let Some(first) = inserted.next() {
            push_joined(&mut joined, first.clone(), true);
        }
        for paragraph in inserted {
            push_joined(&mut joined, paragraph.clone(), false);
        }
        push_joined(&mut joined, self.tree.at(e.major).sub_sequence(e.minor), false);

        let mut from = s.major;
        if from > 0 && is_bare_lf(&joined[0]) {
            let previous = self.tree.at(from - 1);
            if previous.terminator() == LineTerminator::Cr {
                from -= 1;
                joined[0] = previous.with_terminator(LineTerminator::Crlf);
            }
        }
        let to = e.major + 1;

        let removed_paragraphs: Vec<_> = self
            .tree
            .slice(from, to)
            .iter()
            .flat_map(Tree::iter)
            .cloned()
            .collect();
        let added_len = joined.len();
        tracing::trace!(
            offset,
            removed = removed.length(),
            inserted = replacement.length(),
            from,
            removed_paragraphs = removed_paragraphs.len(),
            added_paragraphs = added_len,
            "replace"
        );

        let tree = self.tree.splice(from, to, joined);
        let doc = Self::from_tree(tree)?;
        let change = TextChange::new(offset, removed, replacement);
        let modification = ParagraphModification {
            from,
            removed: removed_paragraphs,
            added_len,
        };
        Ok((doc, change, modification))
    }

    /// Apply `f` to every paragraph.
    pub fn map_paragraphs<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Paragraph<PS, S>) -> Paragraph<PS, S>,
    {
        let mut list = Vec::with_capacity(self.paragraph_count());
        for paragraph in self.paragraphs() {
            push_joined(&mut list, f(paragraph), false);
        }
        close(&mut list);
        Self::from_list(list).unwrap_or_else(|_| self.clone())
    }

    /// Style spans over `[from, to)`.
    ///
    /// Terminator characters are reported with the style of the text before them, so the result
    /// always has length `to - from`.
    pub fn style_spans(&self, from: usize, to: usize) -> Result<StyleSpans<S>, DocumentError> {
        check_range(from, to, self.length())?;
        let s = self.tree.locate(from, Bias::Forward);
        let e = self.tree.locate(to, Bias::Backward);
        if from == to || s.major > e.major {
            return Ok(self.tree.at(s.major).style_spans_range(s.minor, s.minor));
        }
        let mut builder = StyleSpansBuilder::new();
        for (i, paragraph) in self
            .tree
            .slice(s.major, e.major + 1)
            .iter()
            .flat_map(Tree::iter)
            .enumerate()
        {
            let index = s.major + i;
            let start = if index == s.major { s.minor } else { 0 };
            let end = if index == e.major {
                e.minor
            } else {
                paragraph.full_length()
            };
            builder.add_all(paragraph.style_spans_range(start, end));
        }
        builder.create()
    }

    /// Style spans of paragraph `index`, terminator included.
    pub fn paragraph_style_spans(&self, index: usize) -> Result<StyleSpans<S>, DocumentError> {
        Ok(self.paragraph(index)?.style_spans())
    }

    /// Style of the character before `offset` within its paragraph, or of the paragraph's first
    /// character at the start of a paragraph.
    pub fn style_at_position(&self, offset: usize) -> Result<&S, DocumentError> {
        check_offset(offset, self.length())?;
        let pos = self.tree.locate(offset, Bias::Forward);
        Ok(self.tree.at(pos.major).style_at_position(pos.minor))
    }

    /// Paragraph style of the paragraph containing `offset`.
    pub fn paragraph_style_at(&self, offset: usize) -> Result<&PS, DocumentError> {
        check_offset(offset, self.length())?;
        let pos = self.tree.locate(offset, Bias::Forward);
        Ok(self.tree.at(pos.major).paragraph_style())
    }
}

fn is_bare_lf<PS: Clone, S: Clone + PartialEq>(paragraph: &Paragraph<PS, S>) -> bool {
    paragraph.is_empty() && paragraph.terminator() == LineTerminator::Lf
}

/// Append `next` to `list`, fusing it into an unterminated last paragraph and folding a
/// trailing CR + empty LF pair into CRLF.
fn push_joined<PS: Clone, S: Clone + PartialEq>(
    list: &mut Vec<Paragraph<PS, S>>,
    next: Paragraph<PS, S>,
    right_biased: bool,
) {
    match list.last_mut() {
        Some(last) if last.terminator().is_none() => {
            *last = if right_biased {
                last.concat_r(&next)
            } else {
                last.concat(&next)
            };
        }
        _ => list.push(next),
    }

    let n = list.len();
    if n >= 2 && list[n - 2].terminator() == LineTerminator::Cr && is_bare_lf(&list[n - 1]) {
        list.pop();
        if let Some(last) = list.last_mut() {
            *last = last.with_terminator(LineTerminator::Crlf);
        }
    }
}

/// Make sure the list ends with an unterminated paragraph.
fn close<PS: Clone, S: Clone + PartialEq>(list: &mut Vec<Paragraph<PS, S>>) {
    if let Some(last) = list.last()
        && !last.terminator().is_none()
    {
        let tail = last.sub_sequence(last.full_length());
        list.push(tail);
    }
}

impl<PS: Clone + PartialEq, S: Clone + PartialEq> PartialEq for ReadOnlyDocument<PS, S> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.paragraph_count() == other.paragraph_count()
                && self.length() == other.length()
                && self.paragraphs().eq(other.paragraphs()))
    }
}

impl<PS: Clone + Eq, S: Clone + Eq> Eq for ReadOnlyDocument<PS, S> {}

impl<PS: fmt::Debug, S: fmt::Debug> fmt::Debug for ReadOnlyDocument<PS, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tree.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    type Doc = ReadOnlyDocument<(), &'static str>;

    fn doc(text: &str) -> Doc {
        ReadOnlyDocument::from_text(text, (), "s0")
    }

    fn texts(doc: &Doc) -> Vec<String> {
        doc.paragraphs().map(Paragraph::full_text).collect()
    }

    #[test]
    fn test_from_text_structure() {
        let d = doc("ab\ncd\r\n\ref");
        assert_eq!(texts(&d), vec!["ab\n", "cd\r\n", "\r", "ef"]);
        assert_eq!(d.length(), 10);
        assert_eq!(d.char_count(), 6);
        assert_eq!(d.text(), "ab\ncd\r\n\ref");

        let trailing = doc("x\n");
        assert_eq!(texts(&trailing), vec!["x\n", ""]);
        assert_eq!(doc("").paragraph_count(), 1);
    }

    #[test]
    fn test_from_paragraphs_normalizes() {
        let list = vec![
            Paragraph::new((), "a", "s0"),
            Paragraph::new((), "b", "s1").with_terminator(LineTerminator::Lf),
        ];
        let d = ReadOnlyDocument::from_paragraphs(list).unwrap();
        assert_eq!(texts(&d), vec!["ab\n", ""]);
        assert_eq!(
            ReadOnlyDocument::<(), u8>::from_paragraphs(Vec::new()),
            Err(DocumentError::EmptyDocument)
        );
    }

    #[test]
    fn test_positions() {
        let d = doc("abc\r\nde");
        assert_eq!(d.offset_to_position(5, Bias::Forward).unwrap(), Position::new(1, 0));
        assert_eq!(d.offset_to_position(5, Bias::Backward).unwrap(), Position::new(0, 5));
        assert_eq!(d.offset_to_position(4, Bias::Forward).unwrap(), Position::new(0, 4));
        assert_eq!(d.position_to_offset(Position::new(1, 2)).unwrap(), 7);
        assert!(d.offset_to_position(8, Bias::Forward).is_err());
        assert!(d.position_to_offset(Position::new(0, 6)).is_err());
        assert!(d.position_to_offset(Position::new(2, 0)).is_err());
    }

    #[test]
    fn test_split_at_paragraph_end_then_concat() {
        let d = doc("abc\ndef");
        let (left, right) = d.split(3).unwrap();
        assert_eq!(left.text(), "abc");
        assert_eq!(right.text(), "\ndef");
        let joined = left.concat(&right);
        assert_eq!(joined.paragraph_count(), 2);
        assert_eq!(joined, d);
    }

    #[test]
    fn test_split_inside_crlf() {
        let d = doc("ab\r\ncd");
        let (left, right) = d.split(3).unwrap();
        assert_eq!(texts(&left), vec!["ab\r", ""]);
        assert_eq!(texts(&right), vec!["\n", "cd"]);
        let joined = left.concat(&right);
        assert_eq!(texts(&joined), vec!["ab\r\n", "cd"]);
    }

    #[test]
    fn test_split_round_trip_every_offset() {
        let d = doc("one\ntwo\r\n\nthree\rfour");
        for offset in 0..=d.length() {
            let (left, right) = d.split(offset).unwrap();
            assert_eq!(left.length(), offset);
            let joined = left.concat(&right);
            assert_eq!(joined.text(), d.text(), "offset {offset}");
            assert_eq!(joined, d, "offset {offset}");
        }
    }

    #[test]
    fn test_split_at() {
        let d = doc("ab\ncd");
        let (left, right) = d.split_at(0, 3).unwrap();
        assert_eq!(texts(&left), vec!["ab\n", ""]);
        assert_eq!(texts(&right), vec!["cd"]);
        assert!(d.split_at(0, 4).is_err());
    }

    #[test]
    fn test_sub_document() {
        let d = doc("abc\ndef\nghi");
        assert_eq!(d.text_range(2, 9).unwrap(), "c\ndef\ng");
        assert_eq!(texts(&d.sub_document(2, 4).unwrap()), vec!["c\n", ""]);
        assert_eq!(d.sub_document(4, 4).unwrap().length(), 0);
        assert!(d.sub_document(3, 2).is_err());
    }

    #[test]
    fn test_replace_multi_paragraph() {
        let d = doc("ab\ncd");
        let (out, change, modification) = d.replace(1, 4, &doc("X")).unwrap();
        assert_eq!(texts(&out), vec!["aXd"]);
        assert_eq!(out.length(), 3);
        assert_eq!(change.position(), 1);
        assert_eq!(change.removed().text(), "b\nc");
        assert_eq!(change.inserted().text(), "X");
        assert_eq!(modification.from, 0);
        assert_eq!(modification.removed_len(), 2);
        assert_eq!(modification.added_len, 1);
        // The receiver is untouched.
        assert_eq!(d.text(), "ab\ncd");
    }

    #[test]
    fn test_replace_inserting_lines() {
        let d = doc("");
        let (out, change, _) = d.replace(0, 0, &doc("ab\ncd")).unwrap();
        assert_eq!(texts(&out), vec!["ab\n", "cd"]);
        assert_eq!(change.removed().length(), 0);
        assert_eq!(change.inserted().text(), "ab\ncd");
    }

    #[test]
    fn test_replace_refuses_crlf() {
        let d = doc("ab\rcd");
        let (out, _, modification) = d.replace(3, 3, &doc("\n")).unwrap();
        assert_eq!(texts(&out), vec!["ab\r\n", "cd"]);
        assert_eq!(modification.from, 0);

        let (out, _, _) = doc("ab\r\ncd").replace(3, 3, &doc("X")).unwrap();
        assert_eq!(texts(&out), vec!["ab\r", "X\n", "cd"]);

        let (out, _, _) = doc("ab\rX\ncd").replace(3, 4, &doc("")).unwrap();
        assert_eq!(texts(&out), vec!["ab\r\n", "cd"]);
    }

    #[test]
    fn test_replace_rejects_bad_range() {
        let d = doc("abc");
        assert_eq!(
            d.replace(2, 5, &doc("")).unwrap_err(),
            DocumentError::InvalidRange {
                start: 2,
                end: 5,
                length: 3
            }
        );
    }

    #[test]
    fn test_replace_shares_untouched_paragraphs() {
        let d = doc(&"line\n".repeat(50));
        let (out, _, _) = d.replace(0, 1, &doc("L")).unwrap();
        assert_eq!(out.paragraph(0).unwrap().text(), "Line");
        assert_eq!(out.paragraph(49).unwrap(), d.paragraph(49).unwrap());
        assert_eq!(out.length(), d.length());
    }

    #[test]
    fn test_replace_paragraph_keeps_terminator() {
        let d = doc("ab\ncd");
        let (out, change, _) = d
            .replace_paragraph(0, |p| p.restyle("s1"))
            .unwrap();
        assert_eq!(out.text(), d.text());
        assert!(change.is_plain_text_identity());
        assert_eq!(out.paragraph(0).unwrap().style_of_char(0), &"s1");
        assert_eq!(out.paragraph(0).unwrap().terminator(), LineTerminator::Lf);
        assert!(d.replace_paragraph(2, |p| p.clone()).is_err());
    }

    #[test]
    fn test_style_spans_across_paragraphs() {
        let d = doc("ab\ncd");
        let (d, _, _) = d
            .replace_with(1, 4, |removed| removed.map_paragraphs(|p| p.restyle("s1")))
            .unwrap();
        let spans = d.style_spans(0, 5).unwrap();
        assert_eq!(spans, StyleSpans::singleton("s0", 1).append("s1", 3).append("s0", 1));
        assert_eq!(d.style_spans(2, 2).unwrap().length(), 0);
        assert_eq!(d.paragraph_style_spans(1).unwrap().length(), 2);
    }

    #[test]
    fn test_style_at_position() {
        let d = doc("ab\ncd");
        let (d, _, _) = d
            .replace_with(3, 4, |r| r.map_paragraphs(|p| p.restyle("s1")))
            .unwrap();
        assert_eq!(d.style_at_position(3).unwrap(), &"s1");
        assert_eq!(d.style_at_position(5).unwrap(), &"s0");
        assert_eq!(d.style_at_position(2).unwrap(), &"s0");
    }
}
