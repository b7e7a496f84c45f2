//! Source position tracking.
//!
//! Proto3 diagnostics are reported as 1-based (line, column) pairs. The lexer
//! produces byte offsets as it scans (the representation `logos` works in
//! natively); [`LineIndex`] converts those offsets to positions lazily, the
//! same trick `protox` uses in its `LineResolver` (binary search over
//! newline offsets) rather than tracking line/column on every character.

/// A 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A start position plus a length, attached to every token and AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub len: u32,
}

impl Span {
    pub const fn new(start: Position, len: u32) -> Self {
        Span { start, len }
    }
}

/// Maps byte offsets into a source buffer to 1-based (line, column) pairs.
pub struct LineIndex {
    /// Byte offset of the first character of each line (line 0 starts at 0).
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(offset, _)| offset + 1));
        LineIndex { line_starts }
    }

    /// Resolves a byte offset to a 1-based `Position`.
    pub fn position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line - 1,
        };
        let column = offset - self.line_starts[line];
        Position::new(line as u32 + 1, column as u32 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_first_line() {
        let idx = LineIndex::new("hello\nworld\nfoo");
        assert_eq!(idx.position(0), Position::new(1, 1));
        assert_eq!(idx.position(4), Position::new(1, 5));
    }

    #[test]
    fn resolves_later_lines() {
        let idx = LineIndex::new("hello\nworld\nfoo");
        assert_eq!(idx.position(6), Position::new(2, 1));
        assert_eq!(idx.position(11), Position::new(2, 6));
        assert_eq!(idx.position(12), Position::new(3, 1));
    }
}
