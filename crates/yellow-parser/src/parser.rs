//! Core parser infrastructure: token cursor, error reporting, helpers.

use yellow_lexer::token::{Token, TokenKind};
use yellow_types::ast::{Ident, Stmt};
use yellow_types::{ParseError, Span};

/// Maximum nesting of expressions, operator chains and blocks the parser
/// accepts.
///
/// Bounds both the parser's own recursion and the depth of every tree it
/// returns, so building and dropping an AST stays within a 1 MB stack.
/// Deeper programs could not run anyway: evaluation stops at 100 levels.
pub const MAX_NESTING: u32 = 128;

/// The Yellow parser.
///
/// Consumes a token stream produced by the lexer and builds an AST.
/// Stops at the first error.
pub struct Parser {
    /// The token stream. Always ends with `Eof`.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Current expression/block nesting depth.
    pub(crate) depth: u32,
}

impl Parser {
    /// Create a new parser from a token stream.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let span = tokens.last().map(|t| t.span).unwrap_or(Span::point(1, 1));
            tokens.push(Token::new(TokenKind::Eof, span));
        }
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse the whole token stream as a program.
    pub fn parse(mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        while !self.at_end() {
            stmts.push(self.parse_statement()?);
        }
        Ok(stmts)
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Returns the previously consumed token's span.
    pub(crate) fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::point(1, 1)
        }
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Look ahead by `n` tokens from current position.
    pub(crate) fn look_ahead(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a specific token kind. Returns the token if matched.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Result<Token, ParseError> {
        if self.check(expected) {
            Ok(self.advance())
        } else {
            Err(self.error_expected(format!("'{expected}'")))
        }
    }

    /// Expect an identifier token.
    pub(crate) fn expect_identifier(&mut self) -> Result<Ident, ParseError> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                let span = self.advance().span;
                Ok(Ident::new(name, span))
            }
            _ => Err(self.error_expected("identifier")),
        }
    }

    /// Expect a string literal token. Returns the string value and its span.
    pub(crate) fn expect_string_literal(&mut self) -> Result<(String, Span), ParseError> {
        match self.peek_kind().clone() {
            TokenKind::StringLiteral(s) => {
                let span = self.advance().span;
                Ok((s, span))
            }
            _ => Err(self.error_expected("string literal")),
        }
    }

    // ── Nesting ───────────────────────────────────────────────────────────────

    /// Enter one level of nesting; fails past [`MAX_NESTING`].
    pub(crate) fn enter_nesting(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            self.depth -= 1;
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING,
                span: self.current_span(),
            });
        }
        Ok(())
    }

    pub(crate) fn exit_nesting(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Build an error for the current token, given what was expected instead.
    pub(crate) fn error_expected(&self, expected: impl Into<String>) -> ParseError {
        let token = self.peek();
        let expected = expected.into();
        if token.kind == TokenKind::Eof {
            ParseError::UnexpectedEof {
                expected,
                span: token.span,
            }
        } else {
            ParseError::UnexpectedToken {
                found: format!("'{}'", token.kind),
                expected,
                span: token.span,
            }
        }
    }
}
