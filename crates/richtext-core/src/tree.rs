//! Persistent balanced tree of paragraphs.
//!
//! Leaves hold paragraphs, branches cache a [`Summary`] of their subtree and their height. Nodes
//! are shared through `Arc`, so split and join only relink subtrees and every older root stays
//! valid. Balance follows the AVL rule: sibling heights differ by at most one.

use crate::navigator::{Bias, Position};
use crate::paragraph::Paragraph;
use std::sync::Arc;

/// Aggregate of a subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Summary {
    /// Number of paragraphs.
    pub paragraph_count: usize,
    /// Characters of text, terminators excluded.
    pub char_count: usize,
    /// Characters including terminators.
    pub length: usize,
}

impl Summary {
    fn of<PS: Clone, S: Clone + PartialEq>(paragraph: &Paragraph<PS, S>) -> Self {
        Self {
            paragraph_count: 1,
            char_count: paragraph.length(),
            length: paragraph.full_length(),
        }
    }

    fn combine(self, other: Self) -> Self {
        Self {
            paragraph_count: self.paragraph_count + other.paragraph_count,
            char_count: self.char_count + other.char_count,
            length: self.length + other.length,
        }
    }
}

#[derive(Debug)]
enum Node<PS, S> {
    Leaf(Paragraph<PS, S>, Summary),
    Branch {
        left: Arc<Node<PS, S>>,
        right: Arc<Node<PS, S>>,
        summary: Summary,
        height: u8,
    },
}

type Link<PS, S> = Arc<Node<PS, S>>;

impl<PS, S> Node<PS, S> {
    fn summary(&self) -> Summary {
        match self {
            Node::Leaf(_, summary) => *summary,
            Node::Branch { summary, .. } => *summary,
        }
    }

    fn height(&self) -> u8 {
        match self {
            Node::Leaf(..) => 0,
            Node::Branch { height, .. } => *height,
        }
    }

    fn count(&self) -> usize {
        self.summary().paragraph_count
    }

    fn children(&self) -> Option<(&Link<PS, S>, &Link<PS, S>)> {
        match self {
            Node::Leaf(..) => None,
            Node::Branch { left, right, .. } => Some((left, right)),
        }
    }
}

fn branch<PS, S>(left: Link<PS, S>, right: Link<PS, S>) -> Link<PS, S> {
    let summary = left.summary().combine(right.summary());
    let height = left.height().max(right.height()) + 1;
    Arc::new(Node::Branch {
        left,
        right,
        summary,
        height,
    })
}

/// Combine two subtrees whose heights differ by at most two.
fn balance<PS, S>(left: Link<PS, S>, right: Link<PS, S>) -> Link<PS, S> {
    let (hl, hr) = (left.height(), right.height());
    if hl > hr + 1 {
        let Some((ll, lr)) = left.children() else {
            return branch(left, right);
        };
        if ll.height() >= lr.height() {
            return branch(ll.clone(), branch(lr.clone(), right));
        }
        let Some((lrl, lrr)) = lr.children() else {
            return branch(left, right);
        };
        branch(
            branch(ll.clone(), lrl.clone()),
            branch(lrr.clone(), right),
        )
    } else if hr > hl + 1 {
        let Some((rl, rr)) = right.children() else {
            return branch(left, right);
        };
        if rr.height() >= rl.height() {
            return branch(branch(left, rl.clone()), rr.clone());
        }
        let Some((rll, rlr)) = rl.children() else {
            return branch(left, right);
        };
        branch(
            branch(left, rll.clone()),
            branch(rlr.clone(), rr.clone()),
        )
    } else {
        branch(left, right)
    }
}

/// Concatenate two subtrees of arbitrary heights.
fn join<PS, S>(left: Link<PS, S>, right: Link<PS, S>) -> Link<PS, S> {
    let (hl, hr) = (left.height(), right.height());
    if hl > hr + 1 {
        if let Some((ll, lr)) = left.children() {
            let joined = join(lr.clone(), right);
            return balance(ll.clone(), joined);
        }
    } else if hr > hl + 1 {
        if let Some((rl, rr)) = right.children() {
            let joined = join(left, rl.clone());
            return balance(joined, rr.clone());
        }
    }
    branch(left, right)
}

fn join_opt<PS, S>(left: Option<Link<PS, S>>, right: Option<Link<PS, S>>) -> Option<Link<PS, S>> {
    match (left, right) {
        (Some(l), Some(r)) => Some(join(l, r)),
        (l, None) => l,
        (None, r) => r,
    }
}

/// Split into the first `k` paragraphs and the rest.
fn split<PS, S>(node: &Link<PS, S>, k: usize) -> (Option<Link<PS, S>>, Option<Link<PS, S>>) {
    if k == 0 {
        return (None, Some(node.clone()));
    }
    if k >= node.count() {
        return (Some(node.clone()), None);
    }
    let Some((left, right)) = node.children() else {
        return (Some(node.clone()), None);
    };
    let left_count = left.count();
    if k < left_count {
        let (a, b) = split(left, k);
        (a, join_opt(b, Some(right.clone())))
    } else if k == left_count {
        (Some(left.clone()), Some(right.clone()))
    } else {
        let (a, b) = split(right, k - left_count);
        (join_opt(Some(left.clone()), a), b)
    }
}

fn build<PS: Clone, S: Clone + PartialEq>(paragraphs: Vec<Paragraph<PS, S>>) -> Option<Link<PS, S>> {
    let mut level: Vec<Link<PS, S>> = paragraphs
        .into_iter()
        .map(|p| {
            let summary = Summary::of(&p);
            Arc::new(Node::Leaf(p, summary))
        })
        .collect();
    // Bottom-up pairing; an odd node at the end of a level joins its left neighbour.
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut nodes = level.into_iter();
        while let Some(left) = nodes.next() {
            match nodes.next() {
                Some(right) => next.push(join(left, right)),
                None => match next.pop() {
                    Some(prev) => next.push(join(prev, left)),
                    None => next.push(left),
                },
            }
        }
        level = next;
    }
    level.pop()
}

/// A non-empty persistent sequence of paragraphs.
#[derive(Debug)]
pub(crate) struct Tree<PS, S> {
    root: Link<PS, S>,
}

impl<PS, S> Clone for Tree<PS, S> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<PS, S> Tree<PS, S> {
    pub(crate) fn iter(&self) -> Iter<'_, PS, S> {
        let mut iter = Iter {
            stack: Vec::with_capacity(self.root.height() as usize + 1),
            remaining: self.root.count(),
        };
        iter.push_left_spine(&self.root);
        iter
    }
}

impl<PS: Clone, S: Clone + PartialEq> Tree<PS, S> {
    pub(crate) fn single(paragraph: Paragraph<PS, S>) -> Self {
        let summary = Summary::of(&paragraph);
        Self {
            root: Arc::new(Node::Leaf(paragraph, summary)),
        }
    }

    /// Build a balanced tree; `None` if `paragraphs` is empty.
    pub(crate) fn from_paragraphs(paragraphs: Vec<Paragraph<PS, S>>) -> Option<Self> {
        build(paragraphs).map(|root| Self { root })
    }

    pub(crate) fn summary(&self) -> Summary {
        self.root.summary()
    }

    pub(crate) fn paragraph_count(&self) -> usize {
        self.root.count()
    }

    pub(crate) fn length(&self) -> usize {
        self.root.summary().length
    }

    #[cfg(test)]
    pub(crate) fn height(&self) -> u8 {
        self.root.height()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Paragraph<PS, S>> {
        if index >= self.paragraph_count() {
            return None;
        }
        Some(self.at(index))
    }

    /// Paragraph at `index`, clamped to the last paragraph.
    pub(crate) fn at(&self, index: usize) -> &Paragraph<PS, S> {
        let mut node = &self.root;
        let mut index = index.min(self.paragraph_count() - 1);
        loop {
            match &**node {
                Node::Leaf(p, _) => return p,
                Node::Branch { left, right, .. } => {
                    let left_count = left.count();
                    if index < left_count {
                        node = left;
                    } else {
                        index -= left_count;
                        node = right;
                    }
                }
            }
        }
    }

    pub(crate) fn last(&self) -> &Paragraph<PS, S> {
        let mut node = &self.root;
        loop {
            match &**node {
                Node::Leaf(p, _) => return p,
                Node::Branch { right, .. } => node = right,
            }
        }
    }

    pub(crate) fn first(&self) -> &Paragraph<PS, S> {
        let mut node = &self.root;
        loop {
            match &**node {
                Node::Leaf(p, _) => return p,
                Node::Branch { left, .. } => node = left,
            }
        }
    }

    /// Resolve `offset` (at most [`length`](Self::length)) to `(paragraph, column)`.
    ///
    /// At a boundary [`Bias::Backward`] yields the end of the previous paragraph, terminator
    /// included, and [`Bias::Forward`] the start of the next one.
    pub(crate) fn locate(&self, offset: usize, bias: Bias) -> Position {
        let mut node = &self.root;
        let mut offset = offset;
        let mut base = 0;
        loop {
            match &**node {
                Node::Leaf(..) => return Position::new(base, offset),
                Node::Branch { left, right, .. } => {
                    let left_len = left.summary().length;
                    if offset < left_len || (offset == left_len && bias == Bias::Backward) {
                        node = left;
                    } else {
                        offset -= left_len;
                        base += left.count();
                        node = right;
                    }
                }
            }
        }
    }

    /// Offset of the first character of paragraph `index`.
    pub(crate) fn offset_of(&self, index: usize) -> usize {
        let mut node = &self.root;
        let mut index = index.min(self.paragraph_count());
        let mut offset = 0;
        loop {
            match &**node {
                Node::Leaf(..) => {
                    return if index == 0 { offset } else { offset + node.summary().length };
                }
                Node::Branch { left, right, .. } => {
                    let left_count = left.count();
                    if index < left_count {
                        node = left;
                    } else {
                        index -= left_count;
                        offset += left.summary().length;
                        node = right;
                    }
                }
            }
        }
    }

    /// Split into the first `k` paragraphs and the rest; either side may be empty.
    pub(crate) fn split(&self, k: usize) -> (Option<Self>, Option<Self>) {
        let (left, right) = split(&self.root, k);
        (left.map(|root| Self { root }), right.map(|root| Self { root }))
    }

    /// Paragraphs `from..to` as a tree of their own; `None` for an empty range.
    pub(crate) fn slice(&self, from: usize, to: usize) -> Option<Self> {
        if from >= to {
            return None;
        }
        let (_, rest) = split(&self.root, from);
        rest.and_then(|rest| split(&rest, to - from).0)
            .map(|root| Self { root })
    }

    /// Append the paragraphs of `other` without fusing anything.
    #[cfg(test)]
    pub(crate) fn append(&self, other: &Self) -> Self {
        Self {
            root: join(self.root.clone(), other.root.clone()),
        }
    }

    /// Append the given trees in order, skipping missing parts.
    pub(crate) fn concat_all<I>(parts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<Self>>,
    {
        parts
            .into_iter()
            .fold(None, |acc, part| join_opt(acc, part.map(|t| t.root)))
            .map(|root| Self { root })
    }

    /// Replace paragraphs `from..to` with `paragraphs`.
    pub(crate) fn splice(
        &self,
        from: usize,
        to: usize,
        paragraphs: Vec<Paragraph<PS, S>>,
    ) -> Option<Self> {
        let (head, rest) = split(&self.root, from);
        let tail = rest.and_then(|rest| split(&rest, to - from).1);
        let middle = Self::from_paragraphs(paragraphs).map(|t| t.root);
        join_opt(join_opt(head, middle), tail).map(|root| Self { root })
    }

    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }
}

/// In-order iterator over the paragraphs of a [`Tree`].
pub(crate) struct Iter<'a, PS, S> {
    stack: Vec<&'a Link<PS, S>>,
    remaining: usize,
}

impl<'a, PS, S> Iter<'a, PS, S> {
    fn push_left_spine(&mut self, mut node: &'a Link<PS, S>) {
        loop {
            self.stack.push(node);
            match &**node {
                Node::Leaf(..) => break,
                Node::Branch { left, .. } => node = left,
            }
        }
    }
}

impl<'a, PS, S> Iterator for Iter<'a, PS, S> {
    type Item = &'a Paragraph<PS, S>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match &**node {
                Node::Leaf(p, _) => {
                    self.remaining -= 1;
                    return Some(p);
                }
                Node::Branch { right, .. } => self.push_left_spine(right),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<PS, S> ExactSizeIterator for Iter<'_, PS, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_terminator::LineTerminator;

    fn paragraphs(n: usize) -> Vec<Paragraph<(), u8>> {
        (0..n)
            .map(|i| {
                let p = Paragraph::new((), format!("p{i}"), 0u8);
                if i + 1 == n {
                    p
                } else {
                    p.with_terminator(LineTerminator::Lf)
                }
            })
            .collect()
    }

    fn texts(tree: &Tree<(), u8>) -> Vec<String> {
        tree.iter().map(Paragraph::text).collect()
    }

    fn assert_balanced(node: &Link<(), u8>) {
        if let Some((l, r)) = node.children() {
            assert!(l.height().abs_diff(r.height()) <= 1);
            assert_eq!(node.height(), l.height().max(r.height()) + 1);
            assert_eq!(node.summary(), l.summary().combine(r.summary()));
            assert_balanced(l);
            assert_balanced(r);
        }
    }

    #[test]
    fn test_build_is_balanced() {
        for n in [1, 2, 3, 5, 8, 13, 100, 257] {
            let tree = Tree::from_paragraphs(paragraphs(n)).unwrap();
            assert_balanced(&tree.root);
            assert_eq!(tree.paragraph_count(), n);
            assert_eq!(tree.iter().len(), n);
            assert!(f64::from(tree.height()) <= 1.45 * ((n + 2) as f64).log2());
        }
        assert!(Tree::<(), u8>::from_paragraphs(Vec::new()).is_none());
    }

    #[test]
    fn test_get_and_offsets() {
        let tree = Tree::from_paragraphs(paragraphs(12)).unwrap();
        assert_eq!(tree.get(0).unwrap().text(), "p0");
        assert_eq!(tree.get(11).unwrap().text(), "p11");
        assert!(tree.get(12).is_none());
        // "p0\n" .. "p9\n" are 3 chars each, "p10\n" 4.
        assert_eq!(tree.offset_of(3), 9);
        assert_eq!(tree.offset_of(11), 30 + 4);
        assert_eq!(tree.offset_of(12), tree.length());
        assert_eq!(tree.first().text(), "p0");
        assert_eq!(tree.last().text(), "p11");
    }

    #[test]
    fn test_locate_bias() {
        let tree = Tree::from_paragraphs(paragraphs(4)).unwrap();
        assert_eq!(tree.locate(0, Bias::Forward), Position::new(0, 0));
        assert_eq!(tree.locate(3, Bias::Forward), Position::new(1, 0));
        assert_eq!(tree.locate(3, Bias::Backward), Position::new(0, 3));
        assert_eq!(tree.locate(4, Bias::Backward), Position::new(1, 1));
        assert_eq!(tree.locate(11, Bias::Forward), Position::new(3, 2));
    }

    #[test]
    fn test_split_and_append_preserve_order() {
        let tree = Tree::from_paragraphs(paragraphs(20)).unwrap();
        for k in 0..=20 {
            let (l, r) = tree.split(k);
            assert_eq!(l.as_ref().map_or(0, Tree::paragraph_count), k);
            let joined = match (l, r) {
                (Some(l), Some(r)) => l.append(&r),
                (Some(t), None) | (None, Some(t)) => t,
                (None, None) => unreachable!(),
            };
            assert_balanced(&joined.root);
            assert_eq!(texts(&joined), texts(&tree));
        }
    }

    #[test]
    fn test_append_uneven_heights() {
        let big = Tree::from_paragraphs(paragraphs(300)).unwrap();
        let small = Tree::from_paragraphs(paragraphs(2)).unwrap();
        let joined = big.append(&small);
        assert_balanced(&joined.root);
        assert_eq!(joined.paragraph_count(), 302);
        let joined = small.append(&big);
        assert_balanced(&joined.root);
        assert_eq!(joined.get(2).unwrap().text(), "p0");
    }

    #[test]
    fn test_splice_shares_structure() {
        let tree = Tree::from_paragraphs(paragraphs(10)).unwrap();
        let replacement = vec![Paragraph::new((), "new", 0u8).with_terminator(LineTerminator::Lf)];
        let spliced = tree.splice(2, 5, replacement).unwrap();
        assert_eq!(spliced.paragraph_count(), 8);
        assert_eq!(spliced.get(2).unwrap().text(), "new");
        assert_eq!(spliced.get(3).unwrap().text(), "p5");
        // The old version is untouched.
        assert_eq!(tree.paragraph_count(), 10);
        assert_eq!(tree.get(2).unwrap().text(), "p2");
        assert!(!tree.ptr_eq(&spliced));
        assert!(tree.ptr_eq(&tree.clone()));
    }
}
