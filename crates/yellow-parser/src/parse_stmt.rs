//! Statement and block parsing.

use std::rc::Rc;

use yellow_lexer::token::TokenKind;
use yellow_types::ast::*;
use yellow_types::{ParseError, Span};

use crate::parser::Parser;

impl Parser {
    /// Parse a single statement.
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek_kind() {
            TokenKind::Mask => self.parse_mask(),
            TokenKind::Echo => self.parse_echo(),
            TokenKind::Scene => {
                self.advance();
                Ok(Stmt::Scene(self.parse_block()?))
            }
            TokenKind::Hastur => {
                let (condition, body, span) = self.parse_conditional_block()?;
                Ok(Stmt::Hastur(LoopStmt {
                    condition,
                    body,
                    span,
                }))
            }
            // at statement start `rift` is always the loop form
            TokenKind::Rift => {
                let (condition, body, span) = self.parse_conditional_block()?;
                Ok(Stmt::Rift(LoopStmt {
                    condition,
                    body,
                    span,
                }))
            }
            TokenKind::Cassilda => {
                let (condition, then_block, span) = self.parse_conditional_block()?;
                Ok(Stmt::Cassilda(IfStmt {
                    condition,
                    then_block,
                    span,
                }))
            }
            TokenKind::Act => self.parse_act(),
            TokenKind::Carcosa => self.parse_carcosa(),
            TokenKind::Remember => {
                self.advance();
                let name = self.parse_target()?;
                Ok(Stmt::Remember(name))
            }
            TokenKind::Forget => {
                self.advance();
                let name = self.parse_target()?;
                Ok(Stmt::Forget(name))
            }
            // `rewrite name;` rebinds; anything else is a `rewrite` expression
            TokenKind::Rewrite
                if matches!(self.look_ahead(1), TokenKind::Identifier(_))
                    && self.look_ahead(2) == &TokenKind::Semicolon =>
            {
                self.advance();
                let name = self.parse_target()?;
                Ok(Stmt::Rewrite(name))
            }
            TokenKind::Infect => {
                self.advance();
                let name = self.parse_target()?;
                Ok(Stmt::Infect(name))
            }
            TokenKind::Whisper => self.parse_whisper(),
            TokenKind::Anchor => {
                let start = self.advance().span;
                self.expect(&TokenKind::Semicolon)?;
                Ok(Stmt::Anchor(start.merge(self.previous_span())))
            }
            _ => {
                let expr = self.parse_expression()?;
                self.expect(&TokenKind::Semicolon)?;
                let span = expr.span.merge(self.previous_span());
                Ok(Stmt::Expr(ExprStmt { expr, span }))
            }
        }
    }

    /// `"{" { Statement } "}"`
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        let start = self.expect(&TokenKind::LBrace)?.span;
        self.enter_nesting()?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            match self.parse_statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    self.exit_nesting();
                    return Err(e);
                }
            }
        }
        self.exit_nesting();
        self.expect(&TokenKind::RBrace)?;
        Ok(Block {
            stmts,
            span: start.merge(self.previous_span()),
        })
    }

    /// `mask name (-> | =) expr ;`
    fn parse_mask(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let name = self.expect_identifier()?;
        if !self.eat(&TokenKind::Arrow) && !self.eat(&TokenKind::Eq) {
            return Err(self.error_expected("'->'"));
        }
        let value = self.parse_expression()?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(Stmt::Mask(MaskStmt {
            name,
            value,
            span: start.merge(self.previous_span()),
        }))
    }

    /// `echo ( expr ) ;`
    fn parse_echo(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        self.expect(&TokenKind::LParen)?;
        let value = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(Stmt::Echo(EchoStmt {
            value,
            span: start.merge(self.previous_span()),
        }))
    }

    /// `keyword ( expr ) { body }`, shared by `hastur`, `rift` and `cassilda`.
    fn parse_conditional_block(&mut self) -> Result<(Expr, Block, Span), ParseError> {
        let start = self.advance().span;
        self.expect(&TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_block()?;
        let span = start.merge(body.span);
        Ok((condition, body, span))
    }

    /// `act name ( [param { , param }] ) { body }`
    fn parse_act(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.eat(&TokenKind::RParen) {
            loop {
                params.push(self.expect_identifier()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RParen)?;
        }
        let body = self.parse_block()?;
        let span = start.merge(body.span);
        Ok(Stmt::Act(Rc::new(ActDecl {
            name,
            params,
            body,
            span,
        })))
    }

    /// `carcosa [expr] ;`
    fn parse_carcosa(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let value = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon)?;
        Ok(Stmt::Carcosa(ReturnStmt {
            value,
            span: start.merge(self.previous_span()),
        }))
    }

    /// `whisper "code" ;`
    fn parse_whisper(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let (code, _) = self.expect_string_literal()?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(Stmt::Whisper(WhisperStmt {
            code,
            span: start.merge(self.previous_span()),
        }))
    }

    /// `name ;` following `remember`, `forget`, `rewrite` or `infect`.
    fn parse_target(&mut self) -> Result<Ident, ParseError> {
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(name)
    }
}
