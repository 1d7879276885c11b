//! Lexer tests: keywords, operators, literals, comments, positions,
//! error reporting, and the 100-iteration determinism check.

use yellow_lexer::{Lexer, TokenKind, ALL_KEYWORDS};
use yellow_types::{ParseError, SourceFile, Span};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return just the token kinds (excluding final Eof).
fn kinds(source: &str) -> Vec<TokenKind> {
    let sf = SourceFile::anonymous(source);
    let tokens = Lexer::new(&sf).lex().expect("lexing should succeed");
    tokens
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind)
        .collect()
}

/// Lex and return the error.
fn lex_error(source: &str) -> ParseError {
    let sf = SourceFile::anonymous(source);
    Lexer::new(&sf).lex().expect_err("lexing should fail")
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Identifier(name.to_string())
}

// ─────────────────────────────────────────────────────────────────────
// Keywords & identifiers
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_all_keywords_lex_as_keywords() {
    for kw in ALL_KEYWORDS {
        let toks = kinds(kw);
        assert_eq!(toks.len(), 1, "keyword '{kw}' should be a single token");
        assert!(toks[0].is_keyword(), "'{kw}' lexed as {:?}", toks[0]);
    }
}

#[test]
fn test_contagion_keywords() {
    assert_eq!(
        kinds("infect rift entangle rifts"),
        vec![
            TokenKind::Infect,
            TokenKind::Rift,
            TokenKind::Entangle,
            ident("rifts")
        ]
    );
}

#[test]
fn test_keyword_prefix_is_identifier() {
    assert_eq!(kinds("masked echoes"), vec![ident("masked"), ident("echoes")]);
}

#[test]
fn test_identifiers_with_underscores_and_digits() {
    assert_eq!(
        kinds("_hidden the_king2"),
        vec![ident("_hidden"), ident("the_king2")]
    );
}

#[test]
fn test_unicode_identifier() {
    assert_eq!(kinds("mask café"), vec![TokenKind::Mask, ident("café")]);
}

// ─────────────────────────────────────────────────────────────────────
// Literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_numbers() {
    assert_eq!(
        kinds("42 3.14 0"),
        vec![
            TokenKind::NumberLit(42.0),
            TokenKind::NumberLit(3.14),
            TokenKind::NumberLit(0.0)
        ]
    );
}

#[test]
fn test_number_trailing_dot_is_not_fraction() {
    // `1.` is not a valid decimal; the dot is an unexpected character
    let err = lex_error("1.");
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn test_huge_number_is_invalid() {
    let digits = "9".repeat(400);
    match lex_error(&digits) {
        ParseError::InvalidNumber { text, .. } => assert_eq!(text.len(), 400),
        other => panic!("expected InvalidNumber, got {other:?}"),
    }
}

#[test]
fn test_string_literal() {
    assert_eq!(
        kinds(r#""the yellow sign""#),
        vec![TokenKind::StringLiteral("the yellow sign".into())]
    );
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        kinds(r#""a\"b\\c\nd\te""#),
        vec![TokenKind::StringLiteral("a\"b\\c\nd\te".into())]
    );
}

#[test]
fn test_string_with_unicode() {
    assert_eq!(
        kinds(r#""⟨ψ| carcosa""#),
        vec![TokenKind::StringLiteral("⟨ψ| carcosa".into())]
    );
}

#[test]
fn test_unterminated_string() {
    let err = lex_error("echo(\"never closed);");
    assert_eq!(
        err,
        ParseError::UnterminatedString {
            span: Span::new(1, 6, 1, 20)
        }
    );
}

#[test]
fn test_boolean_and_nil_literals() {
    assert_eq!(
        kinds("yellow tattered pallid"),
        vec![TokenKind::Yellow, TokenKind::Tattered, TokenKind::Pallid]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Operators & punctuation
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_operators() {
    assert_eq!(
        kinds("+ - * / == != < > <= >= -> ="),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::EqEq,
            TokenKind::BangEq,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEq,
            TokenKind::GreaterEq,
            TokenKind::Arrow,
            TokenKind::Eq,
        ]
    );
}

#[test]
fn test_arrow_without_spaces() {
    assert_eq!(
        kinds("mask x->1;"),
        vec![
            TokenKind::Mask,
            ident("x"),
            TokenKind::Arrow,
            TokenKind::NumberLit(1.0),
            TokenKind::Semicolon
        ]
    );
}

#[test]
fn test_punctuation() {
    assert_eq!(
        kinds("(){},;"),
        vec![
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::Comma,
            TokenKind::Semicolon
        ]
    );
}

#[test]
fn test_lone_bang_is_rejected() {
    match lex_error("echo(!yellow);") {
        ParseError::UnexpectedToken { found, span, .. } => {
            assert_eq!(found, "character '!'");
            assert_eq!(span, Span::point(1, 6));
        }
        other => panic!("expected UnexpectedToken, got {other:?}"),
    }
}

#[test]
fn test_unknown_character_position() {
    match lex_error("mask a -> 1;\nmask b -> @;") {
        ParseError::UnexpectedToken { found, span, .. } => {
            assert_eq!(found, "character '@'");
            assert_eq!(span.start_line, 2);
            assert_eq!(span.start_col, 11);
        }
        other => panic!("expected UnexpectedToken, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────
// Comments & whitespace
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        kinds("# the king\necho(1); # trailing\n# end"),
        vec![
            TokenKind::Echo,
            TokenKind::LParen,
            TokenKind::NumberLit(1.0),
            TokenKind::RParen,
            TokenKind::Semicolon
        ]
    );
}

#[test]
fn test_empty_source_is_just_eof() {
    let sf = SourceFile::anonymous("   \n\t  ");
    let tokens = Lexer::new(&sf).lex().unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn test_token_spans() {
    let sf = SourceFile::anonymous("mask truth -> 42;");
    let tokens = Lexer::new(&sf).lex().unwrap();
    assert_eq!(tokens[0].span, Span::new(1, 1, 1, 4));
    assert_eq!(tokens[1].span, Span::new(1, 6, 1, 10));
    assert_eq!(tokens[2].span, Span::new(1, 12, 1, 13));
    assert_eq!(tokens[3].span, Span::new(1, 15, 1, 16));
}

#[test]
fn test_from_text_matches_source_file() {
    let text = "echo(\"x\" + \"y\");";
    let sf = SourceFile::anonymous(text);
    assert_eq!(Lexer::new(&sf).lex(), Lexer::from_text(text).lex());
}

// ─────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_determinism_100_iterations() {
    let source = "act f(a, b) { carcosa a * b; }\nmask x -> f(2, 3);\necho(x >= 6);";
    let first = kinds(source);
    for i in 0..100 {
        assert_eq!(first, kinds(source), "Determinism failure at iteration {i}");
    }
}
