//! Two-level position navigation.
//!
//! Maps a flat offset onto a `(major, minor)` pair over a sequence of elements that each have a
//! length: segments within a paragraph, spans within a [`StyleSpans`](crate::StyleSpans), or
//! paragraphs within a document.
//!
//! An offset that sits exactly on the boundary between two elements is ambiguous. [`Bias`]
//! resolves it: [`Bias::Backward`] picks the end of the previous element, [`Bias::Forward`] the
//! start of the next one.

use serde::{Deserialize, Serialize};

/// Which side of an element boundary an offset resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bias {
    /// Prefer the start of the next element.
    Forward,
    /// Prefer the end of the previous element.
    Backward,
}

/// A two-level position: element index (`major`) and offset within that element (`minor`).
///
/// Positions are plain values computed against one particular version of their target. They are
/// only meaningful, and only comparable, against that same version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    /// Element index, e.g. paragraph index within a document.
    pub major: usize,
    /// Offset within the element, e.g. column within a paragraph.
    pub minor: usize,
}

impl Position {
    /// Create a new position.
    pub const fn new(major: usize, minor: usize) -> Self {
        Self { major, minor }
    }
}

/// Navigator over `count` elements whose lengths are given by `elem_length`.
pub struct TwoLevelNavigator<F> {
    count: usize,
    elem_length: F,
}

impl<F> TwoLevelNavigator<F>
where
    F: Fn(usize) -> usize,
{
    /// Create a navigator over `count` elements.
    pub fn new(count: usize, elem_length: F) -> Self {
        Self { count, elem_length }
    }

    /// Number of elements.
    pub fn elem_count(&self) -> usize {
        self.count
    }

    /// Resolve a flat offset.
    ///
    /// Offsets past the end resolve into the last element with an out-of-range `minor`; callers
    /// validate offsets before navigating.
    pub fn offset_to_position(&self, offset: usize, bias: Bias) -> Position {
        self.offset_by(Position::new(0, 0), offset as isize, bias)
    }

    /// Convert a position back to a flat offset.
    pub fn position_to_offset(&self, position: Position) -> usize {
        (0..position.major.min(self.count))
            .map(|i| (self.elem_length)(i))
            .sum::<usize>()
            + position.minor
    }

    /// Move `position` by `amount` (may be negative).
    ///
    /// With `amount == 0` only the bias is applied: a position at the end of an element moves
    /// to the start of the next one under [`Bias::Forward`], and a position at the start of an
    /// element moves to the end of the previous one under [`Bias::Backward`].
    pub fn offset_by(&self, position: Position, amount: isize, bias: Bias) -> Position {
        if self.count == 0 {
            return Position::new(0, position.minor.saturating_add_signed(amount));
        }
        if amount > 0 {
            self.forward(position, amount.unsigned_abs(), bias)
        } else if amount < 0 {
            self.backward(position, amount.unsigned_abs(), bias)
        } else if position.minor == 0 && position.major > 0 && bias == Bias::Backward {
            let major = position.major - 1;
            Position::new(major, (self.elem_length)(major))
        } else if position.major + 1 < self.count
            && position.minor == (self.elem_length)(position.major)
            && bias == Bias::Forward
        {
            Position::new(position.major + 1, 0)
        } else {
            position
        }
    }

    /// Clamp a position in the last element onto its last character.
    ///
    /// Only the last element is affected: a `minor` at or past its end moves onto its last
    /// character.
    pub fn clamp(&self, position: Position) -> Position {
        if self.count > 0 && position.major == self.count - 1 {
            let len = (self.elem_length)(position.major);
            if position.minor < len {
                position
            } else {
                Position::new(position.major, len.saturating_sub(1))
            }
        } else {
            position
        }
    }

    fn forward(&self, position: Position, amount: usize, bias: Bias) -> Position {
        let mut offset = position.minor + amount;
        let mut major = position.major;
        while major + 1 < self.count {
            let len = (self.elem_length)(major);
            if offset < len || (offset == len && bias == Bias::Backward) {
                return Position::new(major, offset);
            }
            offset -= len;
            major += 1;
        }
        // Either inside the last element or beyond it.
        Position::new(self.count - 1, offset)
    }

    fn backward(&self, position: Position, amount: usize, bias: Bias) -> Position {
        let mut offset = amount;
        let mut major = position.major.min(self.count - 1);
        let mut minor = position.minor;
        while major > 0 {
            if offset < minor || (offset == minor && bias == Bias::Forward) {
                return Position::new(major, minor - offset);
            }
            offset -= minor;
            major -= 1;
            minor = (self.elem_length)(major);
        }
        if offset < minor {
            Position::new(0, minor - offset)
        } else {
            Position::new(0, 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lengths(lens: &[usize]) -> TwoLevelNavigator<impl Fn(usize) -> usize + '_> {
        TwoLevelNavigator::new(lens.len(), move |i| lens[i])
    }

    #[test]
    fn test_offset_inside_element_ignores_bias() {
        let lens = [4, 3];
        let nav = lengths(&lens);
        assert_eq!(nav.offset_to_position(1, Bias::Forward), Position::new(0, 1));
        assert_eq!(nav.offset_to_position(1, Bias::Backward), Position::new(0, 1));
        assert_eq!(nav.offset_to_position(5, Bias::Forward), Position::new(1, 1));
    }

    #[test]
    fn test_boundary_respects_bias() {
        let lens = [4, 3];
        let nav = lengths(&lens);
        assert_eq!(nav.offset_to_position(4, Bias::Backward), Position::new(0, 4));
        assert_eq!(nav.offset_to_position(4, Bias::Forward), Position::new(1, 0));
        // End of the last element has nowhere else to go.
        assert_eq!(nav.offset_to_position(7, Bias::Forward), Position::new(1, 3));
    }

    #[test]
    fn test_zero_offset_bias() {
        let lens = [0, 3];
        let nav = lengths(&lens);
        assert_eq!(nav.offset_to_position(0, Bias::Forward), Position::new(1, 0));
        assert_eq!(nav.offset_to_position(0, Bias::Backward), Position::new(0, 0));
        assert_eq!(
            nav.offset_by(Position::new(1, 0), 0, Bias::Backward),
            Position::new(0, 0)
        );
    }

    #[test]
    fn test_backward_movement() {
        let lens = [4, 3, 2];
        let nav = lengths(&lens);
        let end = Position::new(2, 2);
        assert_eq!(nav.offset_by(end, -2, Bias::Backward), Position::new(1, 3));
        assert_eq!(nav.offset_by(end, -2, Bias::Forward), Position::new(2, 0));
        assert_eq!(nav.offset_by(end, -6, Bias::Forward), Position::new(0, 3));
        assert_eq!(nav.offset_by(end, -100, Bias::Forward), Position::new(0, 0));
    }

    #[test]
    fn test_round_trip_offsets() {
        let lens = [2, 0, 5, 1];
        let nav = lengths(&lens);
        for offset in 0..=8 {
            for bias in [Bias::Forward, Bias::Backward] {
                let pos = nav.offset_to_position(offset, bias);
                assert_eq!(nav.position_to_offset(pos), offset, "{offset} {bias:?}");
            }
        }
    }

    #[test]
    fn test_clamp() {
        let lens = [2, 3];
        let nav = lengths(&lens);
        assert_eq!(nav.clamp(Position::new(1, 3)), Position::new(1, 2));
        assert_eq!(nav.clamp(Position::new(0, 2)), Position::new(0, 2));
    }
}
