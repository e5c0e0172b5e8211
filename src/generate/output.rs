/// Output buffer that accumulates generated lines
pub struct Output {
    lines: Vec<String>,
}

impl Output {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add a complete line
    pub fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    /// Add a blank separator line, collapsing consecutive blanks
    pub fn blank(&mut self) {
        if !matches!(self.lines.last(), Some(last) if last.is_empty()) {
            self.lines.push(String::new());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Finish and return the generated code, without trailing blank lines
    pub fn finish(mut self) -> String {
        while matches!(self.lines.last(), Some(last) if last.is_empty()) {
            self.lines.pop();
        }
        self.lines.join("\n")
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
