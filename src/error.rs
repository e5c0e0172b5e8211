use crate::parser::tokenizer::Span;
use std::fmt;

/// Kind of parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnexpectedToken,
    UnclosedBrace,
    UnterminatedString,
    UnterminatedComment,
    InvalidSyntax,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnexpectedToken => "Unexpected token",
            ErrorKind::UnclosedBrace => "Unclosed brace",
            ErrorKind::UnterminatedString => "Unterminated string",
            ErrorKind::UnterminatedComment => "Unterminated comment",
            ErrorKind::InvalidSyntax => "Invalid syntax",
        }
    }
}

/// Error while parsing a declaration source
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    pub related_span: Option<Span>,
    pub related_label: Option<String>,
    pub help: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            related_span: None,
            related_label: None,
            help: None,
        }
    }

    /// Add a related span (e.g., where a brace was opened)
    pub fn with_related(mut self, span: Span) -> Self {
        self.related_span = Some(span);
        self
    }

    /// Set the label for the related span
    pub fn with_related_label(mut self, label: impl Into<String>) -> Self {
        self.related_label = Some(label.into());
        self
    }

    /// Add help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the error with source context and caret underlines
    pub fn render(&self, source: &str, filename: &str) -> String {
        let mut output = String::new();

        let line = self.span.start.line + 1;
        let col = self.span.start.col + 1;
        output.push_str(&format!(" file: {}:{}:{}\n", filename, line, col));
        output.push_str(&format!("error: {}\n", self.message));

        if let Some(source_line) = source.lines().nth(self.span.start.line) {
            let line_num_width = format!("{}", line).len().max(2);
            output.push_str(&format!("{:>width$} |\n", "", width = line_num_width));
            output.push_str(&format!("{:>width$} | {}\n", line, source_line, width = line_num_width));

            let underline_start = self.span.start.col;
            let underline_len = if self.span.end.line == self.span.start.line {
                (self.span.end.col.saturating_sub(self.span.start.col)).max(1)
            } else {
                source_line.len().saturating_sub(underline_start).max(1)
            };
            output.push_str(&format!(
                "{:>width$} | {}{}\n",
                "",
                " ".repeat(underline_start),
                "^".repeat(underline_len),
                width = line_num_width
            ));
        }

        if let Some(ref related) = self.related_span {
            let related_line = related.start.line + 1;
            if let Some(related_source_line) = source.lines().nth(related.start.line) {
                let line_num_width = format!("{}", related_line).len().max(2);
                output.push_str(&format!(
                    "{:>width$} | {}\n",
                    related_line, related_source_line,
                    width = line_num_width
                ));
                let label = self.related_label.as_deref().unwrap_or("opened here");
                let underline_start = related.start.col;
                let underline_len = (related.end.col.saturating_sub(related.start.col)).max(1);
                output.push_str(&format!(
                    "{:>width$} | {}{} {}\n",
                    "",
                    " ".repeat(underline_start),
                    "^".repeat(underline_len),
                    label,
                    width = line_num_width
                ));
            }
        }

        if let Some(ref help) = self.help {
            output.push_str(&format!(" help: {}\n", help));
        }

        output
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}: {}",
            self.kind.as_str(),
            self.span.start.line + 1,
            self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Fatal pipeline errors
#[derive(Debug)]
pub enum ConvertError {
    /// Configuration document missing or unreadable
    Config(String),
    /// After skipping missing files, no declaration files remain
    MissingInputs,
    /// A declaration file failed to parse; message is fully rendered
    Parse { file: String, rendered: String },
    /// Two top-level declarations share a name
    DuplicateDeclaration { name: String, file: String },
    /// I/O failure while reading inputs or writing output
    Io { path: String, source: std::io::Error },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Config(msg) => write!(f, "configuration error: {}", msg),
            ConvertError::MissingInputs => {
                write!(f, "no valid declaration files found")
            }
            ConvertError::Parse { file, rendered } => {
                write!(f, "failed to parse {}\n{}", file, rendered)
            }
            ConvertError::DuplicateDeclaration { name, file } => {
                write!(f, "duplicate declaration '{}' in {}", name, file)
            }
            ConvertError::Io { path, source } => {
                write!(f, "i/o error on {}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
