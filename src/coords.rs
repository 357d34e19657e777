//! Coordinate structures used to pin tokens (and the lexical errors raised against them) to
//! specific locations within the raw input
#![allow(clippy::len_without_is_empty)]

use std::fmt::{Display, Formatter};

/// A [Coords] represents a single character location within the input. Ordering is by
/// `absolute` first, which the line and column always follow.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coords {
    /// The absolute character position, the first character in the input is at position 1
    pub absolute: usize,
    /// The row position
    pub line: usize,
    /// The column position
    pub column: usize,
}

impl Coords {
    /// Produce the coordinates of the character following `c`, where `c` sits at the current
    /// coordinates. A newline moves onto the next row and resets the column.
    pub fn advance(self, c: char) -> Coords {
        if c == '\n' {
            Coords {
                absolute: self.absolute + 1,
                line: self.line + 1,
                column: 0,
            }
        } else {
            Coords {
                absolute: self.absolute + 1,
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl Display for Coords {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[abs: {}, line: {}, column: {}]",
            self.absolute, self.line, self.column
        )
    }
}

impl Default for Coords {
    /// The default set of coordinates are positioned just before the first character
    fn default() -> Self {
        Coords {
            absolute: 0,
            line: 0,
            column: 0,
        }
    }
}

/// A [Span] represents a linear interval within the input, between two different [Coords].
/// Both ends are inclusive.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Start [Coords] for the span
    pub start: Coords,
    /// End [Coords] for the span
    pub end: Coords,
}

impl Span {
    /// A span covering a single character
    pub fn point(coords: Coords) -> Self {
        Span {
            start: coords,
            end: coords,
        }
    }

    /// Get the length of the span in characters, minimum is 1
    pub fn len(&self) -> usize {
        self.end.absolute.max(self.start.absolute) - self.end.absolute.min(self.start.absolute) + 1
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "start: {}, end: {}, length: {}",
            self.start,
            self.end,
            self.len()
        )
    }
}
