//! Token types for the Yellow lexer.
//!
//! Defines [`TokenKind`] covering every lexeme of the language and
//! [`Token`], which pairs a kind with a source [`Span`].

use std::fmt;
use yellow_types::Span;

/// All reserved words.
///
/// These cannot be used as user-defined names. The lexer recognises each
/// one and emits a specific keyword token instead of [`TokenKind::Identifier`].
pub const ALL_KEYWORDS: &[&str] = &[
    // Statements (14)
    "mask", "echo", "scene", "hastur", "cassilda", "act", "carcosa", "remember", "forget",
    "rewrite", "whisper", "anchor", "infect", "rift",
    // Expressions (4)
    "superpose", "collapse", "manifest", "entangle",
    // Literals (3)
    "yellow", "tattered", "pallid",
];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns `true` if this token is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind in the Yellow language.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────

    /// Numeric literal (integer or decimal): `42`, `3.14`
    NumberLit(f64),
    /// String literal: `"hello"`
    StringLiteral(String),
    /// `yellow` (true)
    Yellow,
    /// `tattered` (false)
    Tattered,
    /// `pallid` (nil)
    Pallid,

    // ── Identifiers ──────────────────────────────────────────

    /// User-defined identifier: `truth`, `the_king`
    Identifier(String),

    // ── Statement Keywords ───────────────────────────────────

    /// `mask`
    Mask,
    /// `echo`
    Echo,
    /// `scene`
    Scene,
    /// `hastur`
    Hastur,
    /// `cassilda`
    Cassilda,
    /// `act`
    Act,
    /// `carcosa`
    Carcosa,
    /// `remember`
    Remember,
    /// `forget`
    Forget,
    /// `rewrite`
    Rewrite,
    /// `whisper`
    Whisper,
    /// `anchor`
    Anchor,
    /// `infect`
    Infect,
    /// `rift` (loop statement or expression)
    Rift,

    // ── Expression Keywords ──────────────────────────────────

    /// `superpose`
    Superpose,
    /// `collapse`
    Collapse,
    /// `manifest`
    Manifest,
    /// `entangle`
    Entangle,

    // ── Operators ────────────────────────────────────────────

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEq,
    /// `>=`
    GreaterEq,
    /// `->` (binding arrow)
    Arrow,
    /// `=` (binding, alternative spelling of `->`)
    Eq,

    // ── Punctuation ──────────────────────────────────────────

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,

    // ── Special ──────────────────────────────────────────────

    /// End of input
    Eof,
}

impl TokenKind {
    /// Look up a reserved word. Returns `None` for user identifiers.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            "mask" => TokenKind::Mask,
            "echo" => TokenKind::Echo,
            "scene" => TokenKind::Scene,
            "hastur" => TokenKind::Hastur,
            "cassilda" => TokenKind::Cassilda,
            "act" => TokenKind::Act,
            "carcosa" => TokenKind::Carcosa,
            "remember" => TokenKind::Remember,
            "forget" => TokenKind::Forget,
            "rewrite" => TokenKind::Rewrite,
            "whisper" => TokenKind::Whisper,
            "anchor" => TokenKind::Anchor,
            "infect" => TokenKind::Infect,
            "rift" => TokenKind::Rift,
            "superpose" => TokenKind::Superpose,
            "collapse" => TokenKind::Collapse,
            "manifest" => TokenKind::Manifest,
            "entangle" => TokenKind::Entangle,
            "yellow" => TokenKind::Yellow,
            "tattered" => TokenKind::Tattered,
            "pallid" => TokenKind::Pallid,
            _ => return None,
        })
    }

    /// Returns `true` if this token kind is a reserved word.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Mask
                | TokenKind::Echo
                | TokenKind::Scene
                | TokenKind::Hastur
                | TokenKind::Cassilda
                | TokenKind::Act
                | TokenKind::Carcosa
                | TokenKind::Remember
                | TokenKind::Forget
                | TokenKind::Rewrite
                | TokenKind::Whisper
                | TokenKind::Anchor
                | TokenKind::Infect
                | TokenKind::Rift
                | TokenKind::Superpose
                | TokenKind::Collapse
                | TokenKind::Manifest
                | TokenKind::Entangle
                | TokenKind::Yellow
                | TokenKind::Tattered
                | TokenKind::Pallid
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Literals
            TokenKind::NumberLit(n) => write!(f, "{n}"),
            TokenKind::StringLiteral(s) => write!(f, "\"{s}\""),
            TokenKind::Identifier(name) => f.write_str(name),

            // Keywords
            TokenKind::Mask => f.write_str("mask"),
            TokenKind::Echo => f.write_str("echo"),
            TokenKind::Scene => f.write_str("scene"),
            TokenKind::Hastur => f.write_str("hastur"),
            TokenKind::Cassilda => f.write_str("cassilda"),
            TokenKind::Act => f.write_str("act"),
            TokenKind::Carcosa => f.write_str("carcosa"),
            TokenKind::Remember => f.write_str("remember"),
            TokenKind::Forget => f.write_str("forget"),
            TokenKind::Rewrite => f.write_str("rewrite"),
            TokenKind::Whisper => f.write_str("whisper"),
            TokenKind::Anchor => f.write_str("anchor"),
            TokenKind::Infect => f.write_str("infect"),
            TokenKind::Rift => f.write_str("rift"),
            TokenKind::Superpose => f.write_str("superpose"),
            TokenKind::Collapse => f.write_str("collapse"),
            TokenKind::Manifest => f.write_str("manifest"),
            TokenKind::Entangle => f.write_str("entangle"),
            TokenKind::Yellow => f.write_str("yellow"),
            TokenKind::Tattered => f.write_str("tattered"),
            TokenKind::Pallid => f.write_str("pallid"),

            // Operators
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::EqEq => f.write_str("=="),
            TokenKind::BangEq => f.write_str("!="),
            TokenKind::Less => f.write_str("<"),
            TokenKind::Greater => f.write_str(">"),
            TokenKind::LessEq => f.write_str("<="),
            TokenKind::GreaterEq => f.write_str(">="),
            TokenKind::Arrow => f.write_str("->"),
            TokenKind::Eq => f.write_str("="),

            // Punctuation
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Semicolon => f.write_str(";"),

            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_keyword_round_trips() {
        for kw in ALL_KEYWORDS {
            let kind = TokenKind::from_keyword(kw)
                .unwrap_or_else(|| panic!("'{kw}' should be a keyword"));
            assert!(kind.is_keyword());
            assert_eq!(&kind.to_string(), kw);
        }
    }

    #[test]
    fn test_identifiers_are_not_keywords() {
        assert_eq!(TokenKind::from_keyword("truth"), None);
        assert_eq!(TokenKind::from_keyword("Mask"), None);
        assert!(!TokenKind::Identifier("mask_of".into()).is_keyword());
    }
}
