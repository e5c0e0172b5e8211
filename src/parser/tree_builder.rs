use super::tokenizer::{Span, Token};
use crate::ast::*;
use crate::error::{ErrorKind, ParseError};
use std::sync::Arc;

/// Builds a declaration syntax tree from a token stream
pub struct TreeBuilder {
    tokens: Vec<Token>,
    pos: usize,
    source: Arc<str>,
}

impl TreeBuilder {
    pub fn new(tokens: Vec<Token>, source: Arc<str>) -> Self {
        Self { tokens, pos: 0, source }
    }

    pub fn build(&mut self) -> Result<Vec<DeclNode>, ParseError> {
        let mut decls = Vec::new();
        let mut pending_comments: Vec<String> = Vec::new();

        loop {
            match self.peek().cloned() {
                None | Some(Token::Eof { .. }) => break,

                Some(Token::Newline { .. }) => {
                    self.advance();
                }

                Some(Token::LineComment { text, .. }) | Some(Token::BlockComment { text, .. }) => {
                    pending_comments.push(text);
                    self.advance();
                }

                Some(Token::Punct { ch: ';', .. }) => {
                    self.advance();
                }

                Some(Token::Ident { text, span }) => {
                    if let Some(decl) = self.parse_top_level(&text, span, &mut pending_comments)? {
                        decls.push(decl);
                    }
                }

                Some(other) => {
                    return Err(ParseError::new(
                        ErrorKind::InvalidSyntax,
                        "Expected a top-level declaration.",
                        other.span(),
                    )
                    .with_help("Only interface, type alias and enum declarations are supported."));
                }
            }
        }

        Ok(decls)
    }

    fn parse_top_level(
        &mut self,
        keyword: &str,
        span: Span,
        pending_comments: &mut Vec<String>,
    ) -> Result<Option<DeclNode>, ParseError> {
        match keyword {
            "export" | "declare" => {
                self.advance();
                // `export { ... }`, `export * from`, `export default ...` carry
                // no type declaration; skip the whole statement.
                match self.peek() {
                    Some(Token::Punct { ch: '{', .. }) | Some(Token::Punct { ch: '*', .. }) => {
                        self.skip_statement();
                        pending_comments.clear();
                    }
                    Some(Token::Ident { text, .. }) if text == "default" => {
                        self.skip_statement();
                        pending_comments.clear();
                    }
                    _ => {}
                }
                Ok(None)
            }

            "import" => {
                self.skip_statement();
                pending_comments.clear();
                Ok(None)
            }

            "interface" => {
                let comments = std::mem::take(pending_comments);
                Ok(Some(DeclNode::Interface(self.parse_interface(comments)?)))
            }

            "type" => {
                let comments = std::mem::take(pending_comments);
                Ok(Some(DeclNode::TypeAlias(self.parse_type_alias(comments)?)))
            }

            "enum" => {
                let comments = std::mem::take(pending_comments);
                Ok(Some(DeclNode::Enum(self.parse_enum(comments)?)))
            }

            "const" if self.peek_ident_at(1) == Some("enum") => {
                self.advance(); // const
                let comments = std::mem::take(pending_comments);
                Ok(Some(DeclNode::Enum(self.parse_enum(comments)?)))
            }

            other => Err(ParseError::new(
                ErrorKind::InvalidSyntax,
                format!("Unexpected top-level statement starting with '{}'.", other),
                span,
            )
            .with_help("Only interface, type alias and enum declarations are supported.")),
        }
    }

    // === Declarations ===

    fn parse_interface(&mut self, comments: Vec<String>) -> Result<InterfaceNode, ParseError> {
        let start = self.current_span();
        self.advance(); // interface

        let (name, _) = self.expect_ident("an interface name")?;

        let mut extends = Vec::new();
        if self.peek_ident() == Some("extends") {
            self.advance();
            loop {
                self.skip_newlines();
                extends.push(self.parse_heritage_ref()?);
                if matches!(self.peek(), Some(Token::Punct { ch: ',', .. })) {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        let (members, body_span) = self.parse_object_body()?;

        Ok(InterfaceNode {
            name,
            extends,
            members,
            comments,
            span: Span { start: start.start, end: body_span.end },
        })
    }

    fn parse_type_alias(&mut self, comments: Vec<String>) -> Result<TypeAliasNode, ParseError> {
        let start = self.current_span();
        self.advance(); // type

        let (name, _) = self.expect_ident("a type alias name")?;
        self.expect_punct('=', "Expected '=' after the type alias name.")?;
        let ty = self.parse_type()?;

        Ok(TypeAliasNode {
            name,
            span: Span { start: start.start, end: ty.span.end },
            ty,
            comments,
        })
    }

    fn parse_enum(&mut self, comments: Vec<String>) -> Result<EnumNode, ParseError> {
        let start = self.current_span();
        self.advance(); // enum

        let (name, _) = self.expect_ident("an enum name")?;
        let open_span = self.current_span();
        self.expect_punct('{', "Expected '{' to open the enum body.")?;

        let mut members = Vec::new();
        loop {
            match self.peek().cloned() {
                None | Some(Token::Eof { .. }) => {
                    return Err(ParseError::new(
                        ErrorKind::UnclosedBrace,
                        "This enum body is never closed.",
                        self.current_span(),
                    )
                    .with_related(open_span));
                }
                Some(Token::Newline { .. })
                | Some(Token::Punct { ch: ',', .. })
                | Some(Token::Punct { ch: ';', .. })
                | Some(Token::LineComment { .. })
                | Some(Token::BlockComment { .. }) => {
                    self.advance();
                }
                Some(Token::Punct { ch: '}', span }) => {
                    self.advance();
                    return Ok(EnumNode {
                        name,
                        members,
                        comments,
                        span: Span { start: start.start, end: span.end },
                    });
                }
                Some(token) => {
                    members.push(self.parse_enum_member(token)?);
                }
            }
        }
    }

    fn parse_enum_member(&mut self, token: Token) -> Result<EnumMemberNode, ParseError> {
        let (name, name_span) = match token {
            Token::Ident { text, span } => {
                self.advance();
                (text, span)
            }
            Token::StringLit { value, span, .. } => {
                self.advance();
                (value, span)
            }
            other => {
                return Err(ParseError::new(
                    ErrorKind::UnexpectedToken,
                    "Expected an enum member name.",
                    other.span(),
                ));
            }
        };

        let mut value = None;
        let mut end = name_span.end;
        if matches!(self.peek(), Some(Token::Punct { ch: '=', .. })) {
            self.advance();
            self.skip_newlines();
            match self.peek().cloned() {
                // Only literal string initializers are captured; anything else
                // falls back to the member name at extraction time.
                Some(Token::StringLit { value: v, span, .. }) => {
                    value = Some(v);
                    end = span.end;
                    self.advance();
                }
                _ => {
                    end = self.skip_initializer_expression();
                }
            }
        }

        Ok(EnumMemberNode {
            name,
            value,
            span: Span { start: name_span.start, end },
        })
    }

    /// Skip a non-string enum initializer up to the next top-level ',' or '}'
    fn skip_initializer_expression(&mut self) -> crate::ast::Position {
        let mut depth = 0usize;
        let mut end = self.current_span().end;
        while let Some(token) = self.peek() {
            match token {
                Token::Eof { .. } => break,
                Token::Punct { ch: '(', .. }
                | Token::Punct { ch: '[', .. }
                | Token::Punct { ch: '{', .. } => depth += 1,
                Token::Punct { ch: ')', .. }
                | Token::Punct { ch: ']', .. } => depth = depth.saturating_sub(1),
                Token::Punct { ch: '}', .. } if depth == 0 => break,
                Token::Punct { ch: '}', .. } => depth -= 1,
                Token::Punct { ch: ',', .. } | Token::Newline { .. } if depth == 0 => break,
                _ => {}
            }
            end = token.span().end;
            self.advance();
        }
        end
    }

    /// Parse one base-type reference of an `extends` clause: the bare
    /// (possibly dotted) name, with any generic arguments skipped
    fn parse_heritage_ref(&mut self) -> Result<String, ParseError> {
        let (mut name, _) = self.expect_ident("a base type name")?;
        while matches!(self.peek(), Some(Token::Punct { ch: '.', .. })) {
            self.advance();
            let (part, _) = self.expect_ident("a name after '.'")?;
            name.push('.');
            name.push_str(&part);
        }
        if matches!(self.peek(), Some(Token::Punct { ch: '<', .. })) {
            self.skip_balanced('<', '>')?;
        }
        Ok(name)
    }

    // === Object bodies and member signatures ===

    /// Parse `{ member; member; ... }`, returning the members and the span
    /// covering both braces. Shared by interface bodies and inline object
    /// literal types.
    fn parse_object_body(&mut self) -> Result<(Vec<MemberNode>, Span), ParseError> {
        let open_span = self.current_span();
        self.expect_punct('{', "Expected '{' to open the body.")?;

        let mut members = Vec::new();
        let mut pending_comments: Vec<String> = Vec::new();

        loop {
            match self.peek().cloned() {
                None | Some(Token::Eof { .. }) => {
                    return Err(ParseError::new(
                        ErrorKind::UnclosedBrace,
                        "This body is never closed.",
                        self.current_span(),
                    )
                    .with_related(open_span)
                    .with_help("Close with '}'"));
                }

                Some(Token::Newline { .. })
                | Some(Token::Punct { ch: ';', .. })
                | Some(Token::Punct { ch: ',', .. }) => {
                    self.advance();
                }

                Some(Token::LineComment { text, .. }) | Some(Token::BlockComment { text, .. }) => {
                    pending_comments.push(text);
                    self.advance();
                }

                Some(Token::Punct { ch: '}', span }) => {
                    self.advance();
                    return Ok((members, Span { start: open_span.start, end: span.end }));
                }

                // Index signature: `[key: string]: T` — not a named member
                Some(Token::Punct { ch: '[', .. }) => {
                    self.skip_balanced('[', ']')?;
                    if matches!(self.peek(), Some(Token::Punct { ch: '?', .. })) {
                        self.advance();
                    }
                    if matches!(self.peek(), Some(Token::Punct { ch: ':', .. })) {
                        self.advance();
                        self.parse_type()?;
                    }
                    pending_comments.clear();
                }

                Some(_) => {
                    let comments = std::mem::take(&mut pending_comments);
                    if let Some(member) = self.parse_member(comments)? {
                        members.push(member);
                    }
                }
            }
        }
    }

    /// Parse one member signature; returns None for skipped method signatures
    fn parse_member(&mut self, comments: Vec<String>) -> Result<Option<MemberNode>, ParseError> {
        // `readonly` is a modifier only when a member name follows it
        if self.peek_ident() == Some("readonly")
            && matches!(
                self.peek_at(1),
                Some(Token::Ident { .. }) | Some(Token::StringLit { .. }) | Some(Token::Number { .. })
            )
        {
            self.advance();
        }

        let (name, name_span) = match self.peek().cloned() {
            Some(Token::Ident { text, span }) => {
                self.advance();
                (text, span)
            }
            Some(Token::StringLit { value, span, .. }) => {
                self.advance();
                (value, span)
            }
            Some(Token::Number { text, span }) => {
                self.advance();
                (text, span)
            }
            Some(other) => {
                return Err(ParseError::new(
                    ErrorKind::UnexpectedToken,
                    "Expected a member name.",
                    other.span(),
                ));
            }
            None => unreachable!("caller checked for EOF"),
        };

        let optional = if matches!(self.peek(), Some(Token::Punct { ch: '?', .. })) {
            self.advance();
            true
        } else {
            false
        };

        // Method signature: name followed by a call or type-parameter list.
        // Only property signatures become records; methods are skipped.
        if matches!(self.peek(), Some(Token::Punct { ch: '<', .. })) {
            self.skip_balanced('<', '>')?;
        }
        if matches!(self.peek(), Some(Token::Punct { ch: '(', .. })) {
            self.skip_balanced('(', ')')?;
            if matches!(self.peek(), Some(Token::Punct { ch: ':', .. })) {
                self.advance();
                self.parse_type()?;
            }
            return Ok(None);
        }

        self.expect_punct(':', "Expected ':' after the member name.")
            .map_err(|e| e.with_help("Write the member as 'name: type'"))?;

        let ty = self.parse_type()?;

        Ok(Some(MemberNode {
            name,
            optional,
            span: Span { start: name_span.start, end: ty.span.end },
            ty,
            comments,
        }))
    }

    // === Type expressions ===

    /// Parse a type expression. A newline ends the expression unless it is
    /// syntactically incomplete or the next significant token continues a
    /// union/intersection.
    pub fn parse_type(&mut self) -> Result<TypeNode, ParseError> {
        self.skip_newlines();
        // Leading '|' of a multi-line union list
        if matches!(self.peek(), Some(Token::Punct { ch: '|', .. })) {
            self.advance();
            self.skip_newlines();
        }
        self.parse_union()
    }

    fn parse_union(&mut self) -> Result<TypeNode, ParseError> {
        let mut members = vec![self.parse_intersection()?];

        loop {
            let checkpoint = self.pos;
            self.skip_newlines();
            if matches!(self.peek(), Some(Token::Punct { ch: '|', .. })) {
                self.advance();
                self.skip_newlines();
                members.push(self.parse_intersection()?);
            } else {
                self.pos = checkpoint;
                break;
            }
        }

        if members.len() >= 2 {
            let span = Span {
                start: members[0].span.start,
                end: members.last().map(|m| m.span.end).unwrap_or(members[0].span.end),
            };
            Ok(TypeNode {
                kind: TypeKind::Union(members),
                text: self.slice(span),
                span,
            })
        } else {
            Ok(members.pop().expect("at least one union member"))
        }
    }

    fn parse_intersection(&mut self) -> Result<TypeNode, ParseError> {
        let mut parts = vec![self.parse_postfix()?];

        loop {
            let checkpoint = self.pos;
            self.skip_newlines();
            if matches!(self.peek(), Some(Token::Punct { ch: '&', .. })) {
                self.advance();
                self.skip_newlines();
                parts.push(self.parse_postfix()?);
            } else {
                self.pos = checkpoint;
                break;
            }
        }

        if parts.len() >= 2 {
            let span = Span {
                start: parts[0].span.start,
                end: parts.last().map(|p| p.span.end).unwrap_or(parts[0].span.end),
            };
            // Intersections are captured verbatim; no structural decomposition
            Ok(TypeNode { kind: TypeKind::Other, text: self.slice(span), span })
        } else {
            Ok(parts.pop().expect("at least one intersection part"))
        }
    }

    fn parse_postfix(&mut self) -> Result<TypeNode, ParseError> {
        let mut base = self.parse_primary()?;

        // Bracket-array suffix, possibly repeated: T[][]
        while matches!(self.peek(), Some(Token::Punct { ch: '[', .. }))
            && matches!(self.peek_at(1), Some(Token::Punct { ch: ']', .. }))
        {
            self.advance();
            let close = self.current_span();
            self.advance();
            let span = Span { start: base.span.start, end: close.end };
            base = TypeNode {
                kind: TypeKind::Array(Box::new(base)),
                text: self.slice(span),
                span,
            };
        }

        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<TypeNode, ParseError> {
        match self.peek().cloned() {
            // Inline object literal shape
            Some(Token::Punct { ch: '{', .. }) => {
                let (members, span) = self.parse_object_body()?;
                Ok(TypeNode {
                    kind: TypeKind::Object(members),
                    text: self.slice(span),
                    span,
                })
            }

            // Parenthesized group, or a function type `(...) => T`
            Some(Token::Punct { ch: '(', span }) => {
                self.skip_balanced('(', ')')?;
                let mut end = self.last_span().end;
                if matches!(self.peek(), Some(Token::Punct { ch: '=', .. }))
                    && matches!(self.peek_at(1), Some(Token::Punct { ch: '>', .. }))
                {
                    self.advance();
                    self.advance();
                    self.skip_newlines();
                    let ret = self.parse_type()?;
                    end = ret.span.end;
                }
                let full = Span { start: span.start, end };
                Ok(TypeNode { kind: TypeKind::Other, text: self.slice(full), span: full })
            }

            Some(Token::StringLit { span, .. }) | Some(Token::Number { span, .. }) => {
                self.advance();
                Ok(TypeNode { kind: TypeKind::Literal, text: self.slice(span), span })
            }

            // Negative numeric literal
            Some(Token::Punct { ch: '-', span })
                if matches!(self.peek_at(1), Some(Token::Number { .. })) =>
            {
                self.advance();
                let num = self.current_span();
                self.advance();
                let full = Span { start: span.start, end: num.end };
                Ok(TypeNode { kind: TypeKind::Literal, text: self.slice(full), span: full })
            }

            Some(Token::Ident { text, span }) => {
                self.advance();

                // Type operators keep their operand verbatim
                if text == "typeof" || text == "keyof" || text == "readonly" {
                    let operand = self.parse_postfix()?;
                    let full = Span { start: span.start, end: operand.span.end };
                    return Ok(TypeNode { kind: TypeKind::Other, text: self.slice(full), span: full });
                }

                let mut name = text;
                let mut end = span.end;
                while matches!(self.peek(), Some(Token::Punct { ch: '.', .. }))
                    && matches!(self.peek_at(1), Some(Token::Ident { .. }))
                {
                    self.advance();
                    if let Some(Token::Ident { text, span }) = self.peek().cloned() {
                        name.push('.');
                        name.push_str(&text);
                        end = span.end;
                        self.advance();
                    }
                }

                let mut args = Vec::new();
                if matches!(self.peek(), Some(Token::Punct { ch: '<', .. })) {
                    self.advance();
                    self.skip_newlines();
                    args.push(self.parse_type()?);
                    loop {
                        self.skip_newlines();
                        if matches!(self.peek(), Some(Token::Punct { ch: ',', .. })) {
                            self.advance();
                            self.skip_newlines();
                            args.push(self.parse_type()?);
                        } else {
                            break;
                        }
                    }
                    let close = self.current_span();
                    self.expect_punct('>', "Expected '>' to close the type arguments.")?;
                    end = close.end;
                }

                let full = Span { start: span.start, end };
                Ok(TypeNode {
                    kind: TypeKind::Ref { name, args },
                    text: self.slice(full),
                    span: full,
                })
            }

            Some(other) => Err(ParseError::new(
                ErrorKind::UnexpectedToken,
                "Expected a type expression.",
                other.span(),
            )),

            None => Err(ParseError::new(
                ErrorKind::UnexpectedToken,
                "Expected a type expression.",
                self.current_span(),
            )),
        }
    }

    // === Token stream helpers ===

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    fn peek_ident(&self) -> Option<&str> {
        match self.peek() {
            Some(Token::Ident { text, .. }) => Some(text.as_str()),
            _ => None,
        }
    }

    fn peek_ident_at(&self, n: usize) -> Option<&str> {
        match self.peek_at(n) {
            Some(Token::Ident { text, .. }) => Some(text.as_str()),
            _ => None,
        }
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek(), Some(Token::Newline { .. })) {
            self.advance();
        }
    }

    /// Span of the current token, or an empty span at end of source
    fn current_span(&self) -> Span {
        if let Some(token) = self.peek() {
            token.span()
        } else {
            let byte = self.source.len();
            let line = self.source.lines().count().saturating_sub(1);
            let col = self.source.lines().last().map(|l| l.len()).unwrap_or(0);
            let pos = Position { byte, line, col };
            Span { start: pos, end: pos }
        }
    }

    /// Span of the most recently consumed token
    fn last_span(&self) -> Span {
        if self.pos == 0 {
            return self.current_span();
        }
        self.tokens[self.pos - 1].span()
    }

    fn slice(&self, span: Span) -> String {
        self.source[span.start.byte..span.end.byte].trim().to_string()
    }

    fn expect_ident(&mut self, what: &str) -> Result<(String, Span), ParseError> {
        match self.peek().cloned() {
            Some(Token::Ident { text, span }) => {
                self.advance();
                Ok((text, span))
            }
            _ => Err(ParseError::new(
                ErrorKind::UnexpectedToken,
                format!("Expected {}.", what),
                self.current_span(),
            )),
        }
    }

    fn expect_punct(&mut self, ch: char, message: &str) -> Result<Span, ParseError> {
        match self.peek() {
            Some(Token::Punct { ch: c, span }) if *c == ch => {
                let span = *span;
                self.advance();
                Ok(span)
            }
            _ => Err(ParseError::new(
                ErrorKind::UnexpectedToken,
                message,
                self.current_span(),
            )),
        }
    }

    /// Skip a balanced bracket pair, starting at the opener
    fn skip_balanced(&mut self, open: char, close: char) -> Result<(), ParseError> {
        let open_span = self.current_span();
        self.expect_punct(open, "Expected an opening bracket.")?;
        let mut depth = 1usize;

        while depth > 0 {
            match self.peek() {
                None | Some(Token::Eof { .. }) => {
                    return Err(ParseError::new(
                        ErrorKind::UnclosedBrace,
                        format!("This '{}' is never closed.", open),
                        self.current_span(),
                    )
                    .with_related(open_span));
                }
                Some(Token::Punct { ch, .. }) if *ch == open => depth += 1,
                Some(Token::Punct { ch, .. }) if *ch == close => depth -= 1,
                _ => {}
            }
            self.advance();
        }

        Ok(())
    }

    /// Skip a statement up to the next top-level ';' or line break
    fn skip_statement(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token {
                Token::Eof { .. } => break,
                Token::Punct { ch: '(', .. }
                | Token::Punct { ch: '[', .. }
                | Token::Punct { ch: '{', .. } => depth += 1,
                Token::Punct { ch: ')', .. }
                | Token::Punct { ch: ']', .. }
                | Token::Punct { ch: '}', .. } => depth = depth.saturating_sub(1),
                Token::Punct { ch: ';', .. } if depth == 0 => {
                    self.advance();
                    break;
                }
                Token::Newline { .. } if depth == 0 => {
                    self.advance();
                    break;
                }
                _ => {}
            }
            self.advance();
        }
    }
}
