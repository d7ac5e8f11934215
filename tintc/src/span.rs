//! Source spans and line/column conversion.

use std::fmt;

/// A half-open byte range into the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span at `offset`.
    pub fn point(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Returns the smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Half-open containment check.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns the source text covered by this span, if it is in bounds.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A zero-based line/character position. Characters are counted in
/// Unicode scalar values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineCol {
    pub line: u32,
    pub character: u32,
}

impl LineCol {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Maps byte offsets to line/character positions and back.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of every line.
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(idx + 1);
            }
        }
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Converts a byte offset into a position. Offsets past the end clamp to
    /// the end of the text.
    pub fn position(&self, text: &str, offset: usize) -> LineCol {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let character = text
            .get(line_start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(0);
        LineCol::new(line as u32, character as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_of_line_start() {
        let text = "palette {\n  base = \"#191724\"\n}";
        let index = LineIndex::new(text);
        assert_eq!(index.position(text, 10), LineCol::new(1, 0));
        assert_eq!(index.position(text, 12), LineCol::new(1, 2));
    }

    #[test]
    fn test_position_clamps_past_end() {
        let text = "ab\ncd";
        let index = LineIndex::new(text);
        assert_eq!(index.position(text, 3), LineCol::new(1, 0));
        assert_eq!(index.position(text, 99), LineCol::new(1, 2));
    }

    #[test]
    fn test_multibyte_characters() {
        let text = "é = 1";
        let index = LineIndex::new(text);
        assert_eq!(index.position(text, 2), LineCol::new(0, 1));
        assert_eq!(index.position(text, 6), LineCol::new(0, 5));
    }
}
