use crate::error::{ErrorKind, ParseError};

/// Position in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Byte offset in source
    pub byte: usize,
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters)
    pub col: usize,
}

impl Position {
    pub fn new() -> Self {
        Self { byte: 0, line: 0, col: 0 }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

/// Span in source code (a range from start position to end position)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Tokens produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier or keyword: `interface`, `string`, `Array`, `$id`, ...
    Ident { text: String, span: Span },
    /// String literal with quotes stripped; `raw` keeps the original quoting
    StringLit { raw: String, value: String, span: Span },
    /// Numeric literal
    Number { text: String, span: Span },
    /// Single punctuation character: `{ } ( ) [ ] < > | & , ; : ? = . -` etc.
    Punct { ch: char, span: Span },
    /// Line comment, including the leading `//`
    LineComment { text: String, span: Span },
    /// Block comment, including the `/*`..`*/` delimiters
    BlockComment { text: String, span: Span },
    /// Line break (LF or CRLF)
    Newline { span: Span },
    /// End of file
    Eof { position: Position },
}

impl Token {
    pub fn span(&self) -> Span {
        match self {
            Token::Ident { span, .. } => *span,
            Token::StringLit { span, .. } => *span,
            Token::Number { span, .. } => *span,
            Token::Punct { span, .. } => *span,
            Token::LineComment { span, .. } => *span,
            Token::BlockComment { span, .. } => *span,
            Token::Newline { span, .. } => *span,
            Token::Eof { position } => Span { start: *position, end: *position },
        }
    }

    /// True for comment trivia tokens
    pub fn is_comment(&self) -> bool {
        matches!(self, Token::LineComment { .. } | Token::BlockComment { .. })
    }
}

/// Tokenizer for TypeScript declaration sources
pub struct Tokenizer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    position: Position,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            position: Position::new(),
        }
    }

    /// Tokenize the entire source
    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_blanks();
            if self.at_eof() {
                break;
            }

            let start = self.position;
            let ch = self.peek_char();

            let token = if ch == '\n' || ch == '\r' {
                self.consume_newline();
                Token::Newline { span: self.span_from(start) }
            } else if ch == '/' && self.peek_char_at(1) == Some('/') {
                self.consume_line_comment(start)
            } else if ch == '/' && self.peek_char_at(1) == Some('*') {
                self.consume_block_comment(start)?
            } else if is_ident_start(ch) {
                self.consume_ident(start)
            } else if ch.is_ascii_digit() {
                self.consume_number(start)
            } else if ch == '"' || ch == '\'' || ch == '`' {
                self.consume_string(start, ch)?
            } else {
                self.advance_char();
                Token::Punct { ch, span: self.span_from(start) }
            };

            tokens.push(token);
        }

        tokens.push(Token::Eof { position: self.position });
        Ok(tokens)
    }

    fn at_eof(&self) -> bool {
        self.position.byte >= self.bytes.len()
    }

    fn peek_char(&self) -> char {
        self.source[self.position.byte..].chars().next().unwrap_or('\0')
    }

    fn peek_char_at(&self, n: usize) -> Option<char> {
        self.source[self.position.byte..].chars().nth(n)
    }

    /// Advance past the current character, tracking line/col
    fn advance_char(&mut self) {
        let ch = self.peek_char();
        self.position.byte += ch.len_utf8();
        if ch == '\n' {
            self.position.line += 1;
            self.position.col = 0;
        } else {
            self.position.col += 1;
        }
    }

    fn span_from(&self, start: Position) -> Span {
        Span { start, end: self.position }
    }

    /// Skip spaces and tabs (newlines are significant, tokenized separately)
    fn skip_blanks(&mut self) {
        while !self.at_eof() {
            let ch = self.peek_char();
            if ch == ' ' || ch == '\t' {
                self.advance_char();
            } else {
                break;
            }
        }
    }

    fn consume_newline(&mut self) {
        if self.peek_char() == '\r' {
            self.advance_char();
        }
        if !self.at_eof() && self.peek_char() == '\n' {
            self.advance_char();
        }
    }

    fn consume_line_comment(&mut self, start: Position) -> Token {
        while !self.at_eof() && self.peek_char() != '\n' && self.peek_char() != '\r' {
            self.advance_char();
        }
        let text = self.source[start.byte..self.position.byte].trim_end().to_string();
        Token::LineComment { text, span: self.span_from(start) }
    }

    fn consume_block_comment(&mut self, start: Position) -> Result<Token, ParseError> {
        // Skip the opening /*
        self.advance_char();
        self.advance_char();

        loop {
            if self.at_eof() {
                return Err(ParseError::new(
                    ErrorKind::UnterminatedComment,
                    "Block comment is never closed.",
                    self.span_from(start),
                )
                .with_help("Close with '*/'"));
            }
            if self.peek_char() == '*' && self.peek_char_at(1) == Some('/') {
                self.advance_char();
                self.advance_char();
                break;
            }
            self.advance_char();
        }

        let text = self.source[start.byte..self.position.byte].to_string();
        Ok(Token::BlockComment { text, span: self.span_from(start) })
    }

    fn consume_ident(&mut self, start: Position) -> Token {
        while !self.at_eof() && is_ident_continue(self.peek_char()) {
            self.advance_char();
        }
        let text = self.source[start.byte..self.position.byte].to_string();
        Token::Ident { text, span: self.span_from(start) }
    }

    fn consume_number(&mut self, start: Position) -> Token {
        while !self.at_eof() {
            let ch = self.peek_char();
            if ch.is_ascii_digit() || ch == '.' || ch == '_' {
                self.advance_char();
            } else {
                break;
            }
        }
        let text = self.source[start.byte..self.position.byte].to_string();
        Token::Number { text, span: self.span_from(start) }
    }

    fn consume_string(&mut self, start: Position, quote: char) -> Result<Token, ParseError> {
        self.advance_char(); // opening quote

        let mut value = String::new();
        loop {
            if self.at_eof() {
                return Err(ParseError::new(
                    ErrorKind::UnterminatedString,
                    "String literal is never closed.",
                    self.span_from(start),
                )
                .with_help(format!("Close with {quote}")));
            }
            let ch = self.peek_char();
            if ch == quote {
                self.advance_char();
                break;
            }
            // Only template literals may span lines
            if (ch == '\n' || ch == '\r') && quote != '`' {
                return Err(ParseError::new(
                    ErrorKind::UnterminatedString,
                    "String literal is never closed.",
                    self.span_from(start),
                ));
            }
            if ch == '\\' {
                self.advance_char();
                if self.at_eof() {
                    continue;
                }
                let escaped = self.peek_char();
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
                self.advance_char();
            } else {
                value.push(ch);
                self.advance_char();
            }
        }

        let raw = self.source[start.byte..self.position.byte].to_string();
        Ok(Token::StringLit { raw, value, span: self.span_from(start) })
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// Tokenize a declaration source
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    Tokenizer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_keywords() {
        let tokens = tokenize("export interface Foo {\n}\n").unwrap();
        assert!(matches!(&tokens[0], Token::Ident { text, .. } if text == "export"));
        assert!(matches!(&tokens[1], Token::Ident { text, .. } if text == "interface"));
        assert!(matches!(&tokens[2], Token::Ident { text, .. } if text == "Foo"));
        assert!(matches!(&tokens[3], Token::Punct { ch: '{', .. }));
        assert!(matches!(&tokens[4], Token::Newline { .. }));
    }

    #[test]
    fn test_member_with_optional_marker() {
        let tokens = tokenize("ddl?: Date | null\n").unwrap();
        assert!(matches!(&tokens[0], Token::Ident { text, .. } if text == "ddl"));
        assert!(matches!(&tokens[1], Token::Punct { ch: '?', .. }));
        assert!(matches!(&tokens[2], Token::Punct { ch: ':', .. }));
        assert!(matches!(&tokens[3], Token::Ident { text, .. } if text == "Date"));
        assert!(matches!(&tokens[4], Token::Punct { ch: '|', .. }));
        assert!(matches!(&tokens[5], Token::Ident { text, .. } if text == "null"));
    }

    #[test]
    fn test_string_literal_quotes_stripped() {
        let tokens = tokenize("type T = 'choose'\n").unwrap();
        assert!(matches!(&tokens[3], Token::StringLit { value, raw, .. }
            if value == "choose" && raw == "'choose'"));
    }

    #[test]
    fn test_line_comment() {
        let tokens = tokenize("// the course id\ncourseId: CourseId\n").unwrap();
        assert!(matches!(&tokens[0], Token::LineComment { text, .. } if text == "// the course id"));
        assert!(matches!(&tokens[1], Token::Newline { .. }));
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let tokens = tokenize("/**\n * doc\n */\ninterface A {}\n").unwrap();
        assert!(matches!(&tokens[0], Token::BlockComment { text, .. } if text.contains("doc")));
    }

    #[test]
    fn test_unterminated_block_comment_errors() {
        assert!(tokenize("/* never closed").is_err());
    }

    #[test]
    fn test_unterminated_string_errors() {
        assert!(tokenize("type T = 'open\n").is_err());
    }

    #[test]
    fn test_positions_track_lines() {
        let tokens = tokenize("a\nb\n").unwrap();
        let span_b = tokens[2].span();
        assert_eq!(span_b.start.line, 1);
        assert_eq!(span_b.start.col, 0);
    }

    #[test]
    fn test_generic_angle_brackets() {
        let tokens = tokenize("items: Array<string>\n").unwrap();
        assert!(matches!(&tokens[2], Token::Ident { text, .. } if text == "Array"));
        assert!(matches!(&tokens[3], Token::Punct { ch: '<', .. }));
        assert!(matches!(&tokens[4], Token::Ident { text, .. } if text == "string"));
        assert!(matches!(&tokens[5], Token::Punct { ch: '>', .. }));
    }
}
