//! AST node types for the Yellow language.
//!
//! Every node carries a [`Span`] for error reporting.
//! Recursive expressions are boxed; act bodies are shared through [`Rc`] so
//! defining or calling an act never copies its body.

use crate::Span;
use std::rc::Rc;

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ══════════════════════════════════════════════════════════════════════════════

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// `{ statements... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// A statement. Programs are ordered sequences of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `mask name -> expr;`
    Mask(MaskStmt),
    /// `echo(expr);`
    Echo(EchoStmt),
    /// `scene { ... }`
    Scene(Block),
    /// `hastur (cond) { ... }`
    Hastur(LoopStmt),
    /// `cassilda (cond) { ... }`
    Cassilda(IfStmt),
    /// `act name(params) { ... }`
    Act(Rc<ActDecl>),
    /// `carcosa [expr];`
    Carcosa(ReturnStmt),
    /// `remember name;`
    Remember(Ident),
    /// `forget name;`
    Forget(Ident),
    /// `rewrite name;`
    Rewrite(Ident),
    /// `whisper "code";`
    Whisper(WhisperStmt),
    /// `anchor;`
    Anchor(Span),
    /// `infect name;`
    Infect(Ident),
    /// `rift (cond) { ... }`
    Rift(LoopStmt),
    /// `expr;`
    Expr(ExprStmt),
}

impl Stmt {
    /// Source span of the whole statement.
    pub fn span(&self) -> Span {
        match self {
            Stmt::Mask(s) => s.span,
            Stmt::Echo(s) => s.span,
            Stmt::Scene(b) => b.span,
            Stmt::Hastur(l) | Stmt::Rift(l) => l.span,
            Stmt::Cassilda(i) => i.span,
            Stmt::Act(a) => a.span,
            Stmt::Carcosa(r) => r.span,
            Stmt::Remember(id) | Stmt::Forget(id) | Stmt::Rewrite(id) | Stmt::Infect(id) => {
                id.span
            }
            Stmt::Whisper(w) => w.span,
            Stmt::Anchor(span) => *span,
            Stmt::Expr(e) => e.span,
        }
    }

    /// Short name of the statement form, used in traces.
    pub fn keyword(&self) -> &'static str {
        match self {
            Stmt::Mask(_) => "mask",
            Stmt::Echo(_) => "echo",
            Stmt::Scene(_) => "scene",
            Stmt::Hastur(_) => "hastur",
            Stmt::Cassilda(_) => "cassilda",
            Stmt::Act(_) => "act",
            Stmt::Carcosa(_) => "carcosa",
            Stmt::Remember(_) => "remember",
            Stmt::Forget(_) => "forget",
            Stmt::Rewrite(_) => "rewrite",
            Stmt::Whisper(_) => "whisper",
            Stmt::Anchor(_) => "anchor",
            Stmt::Infect(_) => "infect",
            Stmt::Rift(_) => "rift",
            Stmt::Expr(_) => "expression",
        }
    }
}

/// `mask name -> value;`
#[derive(Debug, Clone, PartialEq)]
pub struct MaskStmt {
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

/// `echo(value);`
#[derive(Debug, Clone, PartialEq)]
pub struct EchoStmt {
    pub value: Expr,
    pub span: Span,
}

/// `hastur (condition) { body }` or `rift (condition) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct LoopStmt {
    pub condition: Expr,
    pub body: Block,
    pub span: Span,
}

/// `cassilda (condition) { then_block }`
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_block: Block,
    pub span: Span,
}

/// `act name(params) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct ActDecl {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Block,
    pub span: Span,
}

/// `carcosa [value];`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// `whisper "code";`
#[derive(Debug, Clone, PartialEq)]
pub struct WhisperStmt {
    pub code: String,
    pub span: Span,
}

/// An expression evaluated for its effect.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ── Literals ──
    NumberLit(f64),
    StringLit(String),
    /// `yellow` / `tattered`
    BoolLit(bool),
    /// `pallid`
    NilLit,

    // ── References & calls ──
    Identifier(String),
    /// `name(args)`
    Call { name: Ident, args: Vec<Expr> },

    // ── Operators ──
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// `( expr )`
    Paren(Box<Expr>),

    // ── Fragments & superposition ──
    /// `superpose(a, b, ...)`
    Superpose(Vec<Expr>),
    /// `collapse(expr)`
    Collapse(Box<Expr>),
    /// `manifest(name)`
    Manifest(Ident),
    /// `rewrite expr`
    Rewrite(Box<Expr>),
    /// `rift(expr)`
    Rift(Box<Expr>),
    /// `entangle(name, partner)`
    Entangle { name: Ident, partner: Ident },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Comparison
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Less => "<",
            BinOp::Greater => ">",
            BinOp::LessEq => "<=",
            BinOp::GreaterEq => ">=",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
}
