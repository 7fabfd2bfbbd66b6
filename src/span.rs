use serde::{Serialize, Deserialize};

/// Byte-offset span in source code. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True if `offset` falls inside this span. An offset equal to `end`
    /// still counts as inside, so a cursor sitting just past the last
    /// character of an identifier hits that identifier's span.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Join two spans into the smallest span covering both.
    pub fn to(&self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// A value annotated with its source span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    pub fn dummy(node: T) -> Self {
        Self { node, span: Span::dummy() }
    }
}

/// Maps byte offsets ↔ line:column positions for a single source buffer.
/// Lines and columns are 0-based.
pub struct LineIndex {
    /// Byte offset of the start of each line. line_starts[0] == 0 always.
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0usize];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a (line, column) pair.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        // Binary search: find the last line_start <= offset
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(ins) => ins.saturating_sub(1),
        };
        (line, offset - self.line_starts[line])
    }

    /// Byte offset at which `line` starts. Past-the-end lines clamp to the
    /// last line start.
    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts
            .get(line)
            .or(self.line_starts.last())
            .copied()
            .unwrap_or(0)
    }

    /// The line containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_col(offset).0
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// True if `span` covers any byte of `line`.
    pub fn span_contains_line(&self, span: Span, line: usize) -> bool {
        let (first, _) = self.line_col(span.start);
        let (last, _) = self.line_col(span.end);
        first <= line && line <= last
    }
}
