use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location span.
///
/// Line and column values are 1-based; columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Create a zero-width span at a single position.
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, line, col)
    }

    /// Merge two spans into one that covers both.
    pub fn merge(self, other: Span) -> Span {
        let (start_line, start_col) = (self.start_line, self.start_col)
            .min((other.start_line, other.start_col));
        let (end_line, end_col) = (self.end_line, self.end_col).max((other.end_line, other.end_col));
        Span::new(start_line, start_col, end_line, end_col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// Widest excerpt taken from one source line, in characters.
pub const EXCERPT_WIDTH: usize = 80;

/// The part of a source line an error points into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Excerpt {
    /// The line, or a window of it when the line is long.
    pub text: String,
    /// Character offset of the error position within `text`.
    pub caret: usize,
}

impl Excerpt {
    /// The excerpt under a gutter, with a caret line beneath it.
    pub fn render(&self) -> String {
        format!("  | {}\n  | {}^", self.text, " ".repeat(self.caret))
    }
}

/// Holds a run's source text for error reporting.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
    /// Byte offsets where each line starts.
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Create a new source file.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    /// A source with the conventional name used for host-submitted text.
    pub fn anonymous(source: impl Into<String>) -> Self {
        Self::new("<run>", source)
    }

    /// Extract a source line by 1-based line number, without its line ending.
    pub fn line(&self, line_number: u32) -> Option<&str> {
        let idx = line_number.checked_sub(1)? as usize;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| s.saturating_sub(1))
            .unwrap_or(self.source.len());
        Some(self.source[start..end].trim_end_matches('\r'))
    }

    /// The line holding the start of `span`, windowed to [`EXCERPT_WIDTH`]
    /// characters around that position.
    pub fn excerpt(&self, span: Span) -> Option<Excerpt> {
        let line: Vec<char> = self.line(span.start_line)?.chars().collect();
        let col = (span.start_col as usize).saturating_sub(1).min(line.len());
        let start = col.saturating_sub(EXCERPT_WIDTH / 2);
        let end = (start + EXCERPT_WIDTH).min(line.len());
        Some(Excerpt {
            text: line[start..end].iter().collect(),
            caret: col - start,
        })
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
