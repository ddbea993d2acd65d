//! Source positions of tokens.

use std::fmt;

/// Line/column extent of a token in its source.
///
/// Lines are 1-based. Columns are 0-based indentation columns, so a token at
/// the start of an unindented line has column 0.
///
/// Buffers from tools that count columns from 1 carry column 1 for
/// unindented lines. Replayed here, their first line break opens a block
/// (an extra indent) that only closes at end of file.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Span {
    #[inline]
    pub const fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Span {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Zero-width span at one position.
    #[inline]
    pub const fn at(line: u32, column: u32) -> Self {
        Span::new(line, column, line, column)
    }

    /// Span that stays on one line.
    #[inline]
    pub const fn on_line(line: u32, start_column: u32, end_column: u32) -> Self {
        Span::new(line, start_column, line, end_column)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}..{}:{}",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_column)
    }
}
