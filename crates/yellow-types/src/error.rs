use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Runtime,
    Limit,
    Config,
}

/// Numeric error code (E100–E499).
///
/// Codes are stable across releases so hosts can match on them instead of
/// parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    pub const UNEXPECTED_EOF: Self = Self(101);
    pub const UNTERMINATED_STRING: Self = Self(102);
    pub const INVALID_NUMBER: Self = Self(103);

    // ── Runtime errors (E200–E299) ──
    pub const UNBOUND_IDENTIFIER: Self = Self(200);
    pub const TYPE_MISMATCH: Self = Self(201);
    pub const DIVISION_BY_ZERO: Self = Self(202);
    pub const ARITY_MISMATCH: Self = Self(203);
    pub const NOT_CALLABLE: Self = Self(204);
    pub const NON_FINITE_RESULT: Self = Self(205);
    pub const EMPTY_SUPERPOSITION: Self = Self(206);

    // ── Limit errors (E300–E399) ──
    pub const NESTING_TOO_DEEP: Self = Self(300);
    pub const RECURSION_LIMIT: Self = Self(301);
    pub const STEP_LIMIT: Self = Self(302);
    pub const STABILITY_DEPLETED: Self = Self(303);
    pub const STRING_TOO_LONG: Self = Self(304);

    // ── Configuration errors (E400–E499) ──
    pub const INVALID_CONFIG: Self = Self(400);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Syntax,
            200..=299 => ErrorCategory::Runtime,
            300..=399 => ErrorCategory::Limit,
            400..=499 => ErrorCategory::Config,
            _ => ErrorCategory::Runtime,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Runtime => write!(f, "runtime"),
            Self::Limit => write!(f, "limit"),
            Self::Config => write!(f, "config"),
        }
    }
}

/// A rejected source text.
///
/// The lexer and parser stop at the first problem and report it with the
/// location of the offending token.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseError {
    /// A character or token that cannot appear here.
    #[error("{span}: unexpected {found}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        span: Span,
    },

    /// Input ended in the middle of a statement or expression.
    #[error("{span}: unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String, span: Span },

    /// A string literal with no closing quote.
    #[error("{span}: unterminated string literal")]
    UnterminatedString { span: Span },

    /// A numeric literal that does not fit a finite f64.
    #[error("{span}: invalid number literal '{text}'")]
    InvalidNumber { text: String, span: Span },

    /// Expressions nested beyond what the parser will descend into.
    #[error("{span}: recursion limit exceeded: expression nesting deeper than {limit}")]
    NestingTooDeep { limit: u32, span: Span },
}

impl ParseError {
    /// Location of the offending input.
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEof { span, .. }
            | Self::UnterminatedString { span }
            | Self::InvalidNumber { span, .. }
            | Self::NestingTooDeep { span, .. } => *span,
        }
    }

    /// Stable error code for hosts.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnexpectedToken { .. } => ErrorCode::UNEXPECTED_TOKEN,
            Self::UnexpectedEof { .. } => ErrorCode::UNEXPECTED_EOF,
            Self::UnterminatedString { .. } => ErrorCode::UNTERMINATED_STRING,
            Self::InvalidNumber { .. } => ErrorCode::INVALID_NUMBER,
            Self::NestingTooDeep { .. } => ErrorCode::NESTING_TOO_DEEP,
        }
    }
}
