//! Source-location bookkeeping shared by every pipeline stage.

/// A closed-open character range, 1-based line/column, attached to every
/// token and AST value purely for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
    pub char_begin: usize,
    pub line_number: usize,
}

impl Span {
    pub fn new(begin: usize, end: usize, char_begin: usize, line_number: usize) -> Span {
        Span { begin, end, char_begin, line_number }
    }

    /// A span covering nothing, used for errors with no precise location.
    pub fn zero() -> Span {
        Span { begin: 0, end: 0, char_begin: 0, line_number: 1 }
    }

    /// Merge two spans on the same line into one covering both.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            begin: self.begin.min(other.begin),
            end: self.end.max(other.end),
            char_begin: self.char_begin.min(other.char_begin),
            line_number: self.line_number,
        }
    }
}
