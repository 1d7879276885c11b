//! Yellow parser: converts a token stream into an AST.

mod parse_expr;
mod parse_stmt;
mod parser;

pub use parser::{Parser, MAX_NESTING};

use yellow_lexer::Lexer;
use yellow_types::ast::Stmt;
use yellow_types::{ParseError, SourceFile};

/// Lex and parse a complete program.
///
/// Pure function of `source`: never panics, and every rejection carries the
/// 1-based position of the offending token.
pub fn parse(source: &str) -> Result<Vec<Stmt>, ParseError> {
    let tokens = Lexer::from_text(source).lex()?;
    Parser::new(tokens).parse()
}

/// [`parse`] over a [`SourceFile`], which the caller keeps for rendering
/// the line an error points at.
pub fn parse_source(file: &SourceFile) -> Result<Vec<Stmt>, ParseError> {
    let tokens = Lexer::new(file).lex()?;
    Parser::new(tokens).parse()
}
