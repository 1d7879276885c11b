//! Core Yellow lexer: converts source text to a token stream.
//!
//! Features:
//! - Keywords, operators, punctuation, number and string literals
//! - `#` comments to end of line
//! - String escapes: `\"`, `\\`, `\n`, `\t`
//! - Stops at the first malformed lexeme and reports it with its position

use yellow_types::{ParseError, SourceFile, Span};

use crate::token::{Token, TokenKind};

/// Result of lexing: the token stream, or the first lexical error.
///
/// A successful stream always ends with [`TokenKind::Eof`].
pub type LexResult = Result<Vec<Token>, ParseError>;

/// The Yellow lexer.
pub struct Lexer<'src> {
    /// The full source text.
    source: &'src str,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based, in characters).
    col: u32,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self::from_text(&source_file.source)
    }

    /// Create a lexer directly over a string slice.
    pub fn from_text(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Lex the entire source into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.source[self.pos..].chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip whitespace and `#` comments.
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '#' {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Token scanning
    // ─────────────────────────────────────────────────────────────

    /// Scan one token.
    fn scan_token(&mut self) -> Result<Token, ParseError> {
        self.skip_trivia();

        let start = self.pos;
        let start_line = self.line;
        let start_col = self.col;
        let Some(ch) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, self.current_span()));
        };

        let kind = match ch {
            '"' => return self.scan_string(start_line, start_col),
            '0'..='9' => return self.scan_number(start, start_line, start_col),
            c if c.is_alphabetic() || c == '_' => {
                return Ok(self.scan_identifier(start, start_line, start_col))
            }

            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,

            '-' => self.pick('>', TokenKind::Arrow, TokenKind::Minus),
            '=' => self.pick('=', TokenKind::EqEq, TokenKind::Eq),
            '<' => self.pick('=', TokenKind::LessEq, TokenKind::Less),
            '>' => self.pick('=', TokenKind::GreaterEq, TokenKind::Greater),
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::BangEq
                } else {
                    return Err(self.unexpected_char('!', start_line, start_col));
                }
            }

            other => return Err(self.unexpected_char(other, start_line, start_col)),
        };

        Ok(Token::new(kind, self.span_from(start_line, start_col)))
    }

    /// Consume `next` if it follows, choosing between a two- and one-character token.
    fn pick(&mut self, next: char, double: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek() == Some(next) {
            self.advance();
            double
        } else {
            single
        }
    }

    fn unexpected_char(&self, ch: char, start_line: u32, start_col: u32) -> ParseError {
        ParseError::UnexpectedToken {
            found: format!("character '{ch}'"),
            expected: "a token".into(),
            span: self.span_from(start_line, start_col),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Number literals
    // ─────────────────────────────────────────────────────────────

    fn scan_number(
        &mut self,
        start: usize,
        start_line: u32,
        start_col: u32,
    ) -> Result<Token, ParseError> {
        while let Some('0'..='9') = self.peek() {
            self.advance();
        }

        if self.peek() == Some('.') && matches!(self.peek_second(), Some('0'..='9')) {
            self.advance(); // consume '.'
            while let Some('0'..='9') = self.peek() {
                self.advance();
            }
        }

        let span = self.span_from(start_line, start_col);
        let text = &self.source[start..self.pos];
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Token::new(TokenKind::NumberLit(value), span)),
            _ => Err(ParseError::InvalidNumber {
                text: text.to_string(),
                span,
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Identifiers & keywords
    // ─────────────────────────────────────────────────────────────

    fn scan_identifier(&mut self, start: usize, start_line: u32, start_col: u32) -> Token {
        // First character was already consumed (letter or `_`)
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.pos];
        let kind = TokenKind::from_keyword(text)
            .unwrap_or_else(|| TokenKind::Identifier(text.to_string()));
        Token::new(kind, self.span_from(start_line, start_col))
    }

    // ─────────────────────────────────────────────────────────────
    // String literals
    // ─────────────────────────────────────────────────────────────

    /// Scan a string literal starting after the opening `"`.
    /// Strings may span lines.
    fn scan_string(&mut self, start_line: u32, start_col: u32) -> Result<Token, ParseError> {
        let mut buf = String::new();
        loop {
            match self.advance() {
                None => {
                    return Err(ParseError::UnterminatedString {
                        span: self.span_from(start_line, start_col),
                    })
                }
                Some('"') => {
                    return Ok(Token::new(
                        TokenKind::StringLiteral(buf),
                        self.span_from(start_line, start_col),
                    ))
                }
                Some('\\') => match self.advance() {
                    Some('n') => buf.push('\n'),
                    Some('t') => buf.push('\t'),
                    Some('"') => buf.push('"'),
                    Some('\\') => buf.push('\\'),
                    // Unknown escapes are kept verbatim
                    Some(other) => {
                        buf.push('\\');
                        buf.push(other);
                    }
                    None => {
                        return Err(ParseError::UnterminatedString {
                            span: self.span_from(start_line, start_col),
                        })
                    }
                },
                Some(ch) => buf.push(ch),
            }
        }
    }
}
