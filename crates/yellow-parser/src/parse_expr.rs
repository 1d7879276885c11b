//! Expression parsing with operator precedence.
//!
//! Precedence (lowest → highest):
//! 4. `==`, `!=`, `<`, `>`, `<=`, `>=` (left-associative)
//! 3. `+`, `-`
//! 2. `*`, `/`
//! 1. unary `-`
//!
//! Primaries: literals, identifiers, calls, `( expr )`, `superpose(...)`,
//! `collapse(expr)`, `manifest(name)`, `rewrite primary`, `rift(expr)`,
//! `entangle(name, name)`.

use yellow_lexer::token::TokenKind;
use yellow_types::ast::*;
use yellow_types::ParseError;

use crate::parser::Parser;

type PResult<T> = Result<T, ParseError>;

impl Parser {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> PResult<Expr> {
        self.enter_nesting()?;
        let result = self.parse_comparison();
        self.exit_nesting();
        result
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    // Each folded operator deepens the left spine of the tree by one node,
    // so every fold holds a nesting level until its chain is complete.
    // Errors end the parse, so only the success path releases them.

    /// `CompExpr = AddExpr { CompOp AddExpr }`
    fn parse_comparison(&mut self) -> PResult<Expr> {
        let base = self.depth;
        let mut left = self.parse_add()?;
        while let Some(op) = self.match_comparison_op() {
            self.advance();
            self.enter_nesting()?;
            let right = self.parse_add()?;
            left = binary(left, op, right);
        }
        self.depth = base;
        Ok(left)
    }

    fn match_comparison_op(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::BangEq => Some(BinOp::NotEq),
            TokenKind::Less => Some(BinOp::Less),
            TokenKind::Greater => Some(BinOp::Greater),
            TokenKind::LessEq => Some(BinOp::LessEq),
            TokenKind::GreaterEq => Some(BinOp::GreaterEq),
            _ => None,
        }
    }

    /// `AddExpr = MulExpr { ("+" | "-") MulExpr }`
    fn parse_add(&mut self) -> PResult<Expr> {
        let base = self.depth;
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            self.enter_nesting()?;
            let right = self.parse_mul()?;
            left = binary(left, op, right);
        }
        self.depth = base;
        Ok(left)
    }

    /// `MulExpr = UnaryExpr { ("*" | "/") UnaryExpr }`
    fn parse_mul(&mut self) -> PResult<Expr> {
        let base = self.depth;
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            self.enter_nesting()?;
            let right = self.parse_unary()?;
            left = binary(left, op, right);
        }
        self.depth = base;
        Ok(left)
    }

    /// `UnaryExpr = "-" UnaryExpr | Primary`
    fn parse_unary(&mut self) -> PResult<Expr> {
        if self.check(&TokenKind::Minus) {
            let start = self.advance().span;
            self.enter_nesting()?;
            let operand = self.parse_unary();
            self.exit_nesting();
            let operand = operand?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_primary()
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_primary(&mut self) -> PResult<Expr> {
        let start = self.current_span();
        match self.peek_kind().clone() {
            TokenKind::NumberLit(n) => {
                self.advance();
                Ok(Expr::new(ExprKind::NumberLit(n), start))
            }
            TokenKind::StringLiteral(s) => {
                self.advance();
                Ok(Expr::new(ExprKind::StringLit(s), start))
            }
            TokenKind::Yellow => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLit(true), start))
            }
            TokenKind::Tattered => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLit(false), start))
            }
            TokenKind::Pallid => {
                self.advance();
                Ok(Expr::new(ExprKind::NilLit, start))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                if self.check(&TokenKind::LParen) {
                    let args = self.parse_arg_list()?;
                    let span = start.merge(self.previous_span());
                    Ok(Expr::new(
                        ExprKind::Call {
                            name: Ident::new(name, start),
                            args,
                        },
                        span,
                    ))
                } else {
                    Ok(Expr::new(ExprKind::Identifier(name), start))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                let span = start.merge(self.previous_span());
                Ok(Expr::new(ExprKind::Paren(Box::new(inner)), span))
            }
            TokenKind::Superpose => {
                self.advance();
                let candidates = self.parse_arg_list()?;
                let span = start.merge(self.previous_span());
                Ok(Expr::new(ExprKind::Superpose(candidates), span))
            }
            TokenKind::Collapse => {
                self.advance();
                self.expect(&TokenKind::LParen)?;
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                let span = start.merge(self.previous_span());
                Ok(Expr::new(ExprKind::Collapse(Box::new(inner)), span))
            }
            TokenKind::Manifest => {
                self.advance();
                self.expect(&TokenKind::LParen)?;
                let name = self.expect_identifier()?;
                self.expect(&TokenKind::RParen)?;
                let span = start.merge(self.previous_span());
                Ok(Expr::new(ExprKind::Manifest(name), span))
            }
            TokenKind::Rewrite => {
                self.advance();
                self.enter_nesting()?;
                let target = self.parse_primary();
                self.exit_nesting();
                let target = target?;
                let span = start.merge(target.span);
                Ok(Expr::new(ExprKind::Rewrite(Box::new(target)), span))
            }
            TokenKind::Rift => {
                self.advance();
                self.expect(&TokenKind::LParen)?;
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                let span = start.merge(self.previous_span());
                Ok(Expr::new(ExprKind::Rift(Box::new(inner)), span))
            }
            TokenKind::Entangle => {
                self.advance();
                self.expect(&TokenKind::LParen)?;
                let name = self.expect_identifier()?;
                self.expect(&TokenKind::Comma)?;
                let partner = self.expect_identifier()?;
                self.expect(&TokenKind::RParen)?;
                let span = start.merge(self.previous_span());
                Ok(Expr::new(ExprKind::Entangle { name, partner }, span))
            }
            _ => Err(self.error_expected("expression")),
        }
    }

    /// `"(" [ Expr { "," Expr } ] ")"`
    fn parse_arg_list(&mut self) -> PResult<Vec<Expr>> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }
}

fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}
