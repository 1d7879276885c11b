//! Shared types for the Yellow engine.
//!
//! This crate defines the AST node types, source spans, parse errors and
//! error codes used by the lexer, parser and evaluator.

mod error;
mod span;
pub mod ast;

pub use error::{ErrorCategory, ErrorCode, ParseError};
pub use span::{Excerpt, SourceFile, Span, EXCERPT_WIDTH};

/// Result type used by the lexer and parser.
pub type Result<T> = std::result::Result<T, ParseError>;
