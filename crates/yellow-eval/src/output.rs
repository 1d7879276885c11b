//! Line-oriented output buffer with a byte cap.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    lines: Vec<String>,
    bytes: usize,
    max_bytes: usize,
    truncated: bool,
}

impl OutputBuffer {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            ..Self::default()
        }
    }

    /// Append a line. Once a line would overflow the cap, it and every
    /// later line are dropped.
    pub fn push_line(&mut self, line: impl Into<String>) {
        if self.truncated {
            return;
        }
        let line = line.into();
        let cost = line.len() + usize::from(!self.lines.is_empty());
        if self.bytes + cost > self.max_bytes {
            self.truncated = true;
            return;
        }
        self.bytes += cost;
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// All lines joined with `\n`.
    pub fn into_text(self) -> String {
        self.lines.join("\n")
    }
}
