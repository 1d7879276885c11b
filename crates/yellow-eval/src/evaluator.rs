//! Core expression and statement evaluator.

use std::rc::Rc;

use yellow_types::ast::*;

use crate::budget::ExecutionBudget;
use crate::config::EngineConfig;
use crate::error::{EvalResult, RuntimeError};
use crate::output::OutputBuffer;
use crate::session::Session;
use crate::stability::{self, DecayPolicy};
use crate::value::{Value, PHANTOM_FLAVORS};

/// Glyphs that replace characters of a distorted echo.
const DISTORTION_GLYPHS: &[char] = &[' ', '◈', '⚠', '⟨', '⟩', '↯'];
/// Chance that any one character of a distorted echo is replaced.
const DISTORTION_CHANCE: f64 = 0.3;
/// Chance that a new infection reaches each neighbouring binding.
const SPREAD_CHANCE: f64 = 0.3;
/// Virulence kept by an infection as it spreads.
const SPREAD_FACTOR: f64 = 0.7;
/// A rift loop draws its length below this bound, with a floor of one.
const RIFT_MAX_ITERATIONS: u32 = 10;
/// Below this stability a rift loop ignores its condition.
const RIFT_UNMOORED_BELOW: f64 = 30.0;
/// Chance that an unmoored rift loop stops at any given iteration.
const RIFT_STALL_CHANCE: f64 = 0.3;
/// `rewrite name;` frays reality on every tick that is a multiple of this.
const FRAY_PERIOD: u64 = 10;

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    /// `carcosa` unwinding to the nearest act call (or the top level).
    Return(Value),
}

/// The core evaluator: walks AST nodes against a session's state.
///
/// One evaluator serves one run. Output accumulates in its own buffer and
/// is taken with [`Evaluator::finish`], whether the run succeeded or not.
pub struct Evaluator<'a> {
    session: &'a mut Session,
    budget: &'a mut ExecutionBudget,
    config: &'a EngineConfig,
    decay: DecayPolicy,
    output: OutputBuffer,
    /// Whispers accepted so far in this run.
    whispers: u32,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        session: &'a mut Session,
        budget: &'a mut ExecutionBudget,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            session,
            budget,
            decay: config.decay_policy(),
            output: OutputBuffer::new(config.max_output_bytes),
            config,
            whispers: 0,
        }
    }

    /// Run a program. A top-level `carcosa` ends it early without error.
    pub fn execute(&mut self, stmts: &[Stmt]) -> EvalResult<()> {
        self.exec_block(stmts).map(|_| ())
    }

    pub fn output(&self) -> &OutputBuffer {
        &self.output
    }

    /// Consume the evaluator, yielding everything it printed.
    pub fn finish(self) -> OutputBuffer {
        self.output
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    fn exec_block(&mut self, stmts: &[Stmt]) -> EvalResult<Flow> {
        for stmt in stmts {
            if let Flow::Return(value) = self.exec_stmt(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// Execute one statement.
    ///
    /// The statement is charged (logical tick plus one decay step) before
    /// anything can fail inside it, so an aborted statement still costs
    /// exactly one step.
    pub fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        if self.session.stability <= 0.0 {
            tracing::warn!(statement = stmt.keyword(), "stability depleted");
            return Err(RuntimeError::StabilityDepleted);
        }
        self.budget.step()?;
        let time = self.session.entropy.tick();
        self.session.stability =
            stability::apply_decay(self.session.stability, &self.decay, &mut self.session.entropy);
        tracing::trace!(
            statement = stmt.keyword(),
            line = stmt.span().start_line,
            time,
            stability = self.session.stability,
            "exec"
        );

        self.budget.enter()?;
        let result = self.exec_stmt_inner(stmt);
        self.budget.exit();
        result
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match stmt {
            Stmt::Mask(mask) => {
                let value = self.eval_expr(&mask.value)?;
                let value = self.maybe_phantom(value);
                self.session.env.define(&mask.name.name, value);
            }
            Stmt::Echo(echo) => {
                let value = self.eval_expr(&echo.value)?;
                let value = self.maybe_phantom(value);
                let line = self.voice(&value);
                self.output.push_line(line);
            }
            Stmt::Scene(block) => {
                self.session.env.push_scope();
                let flow = self.exec_block(&block.stmts);
                self.session.env.pop_scope();
                return flow;
            }
            Stmt::Hastur(looped) => return self.exec_loop(looped),
            Stmt::Rift(looped) => return self.exec_rift(looped),
            Stmt::Cassilda(branch) => {
                let condition = self.eval_expr(&branch.condition)?;
                if self.truthy(condition)? {
                    return self.exec_block(&branch.then_block.stmts);
                }
            }
            Stmt::Act(decl) => {
                self.session
                    .env
                    .define(&decl.name.name, Value::Act(Rc::clone(decl)));
            }
            Stmt::Carcosa(ret) => {
                let value = match &ret.value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Nil,
                };
                return Ok(Flow::Return(value));
            }
            Stmt::Remember(name) => {
                let value = self.lookup(&name.name)?;
                self.session
                    .fragments
                    .remember(&name.name, value, self.config.max_fragments);
            }
            Stmt::Forget(name) => {
                self.session.env.remove(&name.name);
                self.output
                    .push_line(format!("Forgotten: {}... but fragments remain", name.name));
            }
            Stmt::Rewrite(name) => {
                let value = self.lookup(&name.name)?;
                let drifted = self.drift(value);
                self.session.env.set(&name.name, drifted);
                if self.session.entropy.now() % FRAY_PERIOD == 0 {
                    self.output.push_line("⚠ Reality frays...");
                    self.penalize(self.config.fray_cost);
                }
            }
            Stmt::Infect(name) => self.exec_infect(name)?,
            Stmt::Whisper(whisper) => return self.exec_whisper(whisper),
            Stmt::Anchor(_) => {
                self.session.stability =
                    stability::restore(self.session.stability, self.config.anchor_restore);
                self.output.push_line("Reality temporarily stabilized");
            }
            Stmt::Expr(expr_stmt) => {
                self.eval_expr(&expr_stmt.expr)?;
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_loop(&mut self, looped: &LoopStmt) -> EvalResult<Flow> {
        let mut iterations = 0u32;
        loop {
            let condition = self.eval_expr(&looped.condition)?;
            if !self.truthy(condition)? {
                return Ok(Flow::Normal);
            }
            if iterations >= self.config.max_loop_iterations {
                tracing::warn!(iterations, "runaway hastur loop broken off");
                self.output.push_line("⚠ Hastur, Hastur, Hastur!");
                self.penalize(self.config.runaway_loop_penalty);
                return Ok(Flow::Normal);
            }
            iterations += 1;
            if let Flow::Return(value) = self.exec_block(&looped.body.stmts)? {
                return Ok(Flow::Return(value));
            }
            self.penalize(self.config.loop_iteration_decay);
        }
    }

    /// A loop whose length is drawn up front. Once stability drops low
    /// enough, each iteration is decided by a draw instead of the condition.
    fn exec_rift(&mut self, looped: &LoopStmt) -> EvalResult<Flow> {
        self.output
            .push_line("⚠ Non-Euclidean loop: space folds upon itself");
        let drawn = (self.session.entropy.next_f64() * f64::from(RIFT_MAX_ITERATIONS)) as u32;
        let limit = drawn.clamp(1, RIFT_MAX_ITERATIONS);

        let mut completed = 0u32;
        while completed < limit {
            let condition = self.eval_expr(&looped.condition)?;
            let holds = self.truthy(condition)?;
            let proceed = if self.session.stability < RIFT_UNMOORED_BELOW {
                self.session.entropy.next_f64() >= RIFT_STALL_CHANCE
            } else {
                holds
            };
            if !proceed {
                break;
            }
            if let Flow::Return(value) = self.exec_block(&looped.body.stmts)? {
                return Ok(Flow::Return(value));
            }
            self.penalize(self.config.rift_iteration_cost);
            completed += 1;
        }
        tracing::debug!(limit, completed, "rift loop closed");
        self.output
            .push_line(format!("⚠ Rift loop completed {completed} iterations"));
        Ok(Flow::Normal)
    }

    /// Infect a bound name, then give every other binding in the same scope
    /// a chance to catch a weaker strain.
    fn exec_infect(&mut self, name: &Ident) -> EvalResult<()> {
        self.lookup(&name.name)?;
        let virulence = 0.5 + self.drift_factor() * 0.5;
        self.session.infections.infect(&name.name, virulence);
        self.penalize(self.config.infection_cost);
        tracing::debug!(name = %name.name, virulence, "infection planted");
        self.output.push_line(format!(
            "⚠ Variable '{}' infected. Contagion spreads...",
            name.name
        ));

        for neighbour in self.session.env.local_names() {
            if neighbour == name.name {
                continue;
            }
            if self.session.entropy.next_f64() < SPREAD_CHANCE {
                self.session
                    .infections
                    .infect(&neighbour, virulence * SPREAD_FACTOR);
                self.output
                    .push_line(format!("  ↳ Infection spreads to '{neighbour}'"));
            }
        }
        Ok(())
    }

    /// Parse and run generated code in place. Refusals print a warning and
    /// are never errors.
    fn exec_whisper(&mut self, whisper: &WhisperStmt) -> EvalResult<Flow> {
        let config = self.config;
        if self.whispers >= config.max_whispers_per_run {
            return Ok(self.refuse_whisper("⚠ Whisper limit exceeded.".to_string()));
        }
        if whisper.code.len() > config.max_whisper_len {
            return Ok(self.refuse_whisper("⚠ Whisper exceeds maximum length.".to_string()));
        }
        if let Some(word) = config.forbidden_word_in(&whisper.code) {
            return Ok(self.refuse_whisper(format!("⚠ Forbidden incantation '{word}' detected.")));
        }
        let stmts = match yellow_parser::parse(&whisper.code) {
            Ok(stmts) => stmts,
            Err(e) => {
                return Ok(self.refuse_whisper(format!("⚠ Whisper fails to manifest: {e}")));
            }
        };
        if stmts.len() > config.max_whisper_statements {
            return Ok(self.refuse_whisper("⚠ Whisper too complex.".to_string()));
        }

        self.whispers += 1;
        self.penalize(config.whisper_cost);
        self.output
            .push_line(format!("◈ Whisper manifests: {}", whisper.code));
        self.exec_block(&stmts)
    }

    fn refuse_whisper(&mut self, message: String) -> Flow {
        tracing::warn!(reason = %message, "whisper refused");
        self.output.push_line(message);
        Flow::Normal
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        self.budget.step()?;
        self.budget.enter()?;
        let result = self.eval_expr_inner(expr);
        self.budget.exit();
        result
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::NumberLit(n) => Ok(Value::Number(*n)),
            ExprKind::StringLit(s) => Ok(Value::String(s.clone())),
            ExprKind::BoolLit(b) => Ok(Value::Bool(*b)),
            ExprKind::NilLit => Ok(Value::Nil),

            ExprKind::Identifier(name) => {
                let value = self.lookup(name)?;
                Ok(self
                    .session
                    .infections
                    .corrupt(name, value, &mut self.session.entropy))
            }
            ExprKind::Call { name, args } => self.eval_call(name, args),

            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right),
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } => match self.eval_expr(operand)? {
                Value::Number(n) => Ok(Value::Number(-n)),
                phantom @ Value::Phantom(_) => Ok(phantom),
                other => Err(RuntimeError::type_mismatch(format!(
                    "cannot negate {}",
                    other.type_name()
                ))),
            },
            ExprKind::Paren(inner) => self.eval_expr(inner),

            ExprKind::Superpose(candidates) => {
                // nested superpositions collapse on entry, so candidates stay flat
                let mut values = Vec::with_capacity(candidates.len());
                for candidate in candidates {
                    let value = self.eval_expr(candidate)?;
                    let value = match value {
                        Value::Superposition(_) => self.collapse(value)?,
                        other => other,
                    };
                    values.push(value);
                }
                Ok(Value::Superposition(values))
            }
            ExprKind::Collapse(inner) => {
                let value = self.eval_expr(inner)?;
                self.collapse(value)
            }
            ExprKind::Manifest(name) => {
                Ok(self.session.fragments.manifest(&name.name).unwrap_or(Value::Nil))
            }
            ExprKind::Rewrite(inner) => {
                let value = self.eval_expr(inner)?;
                Ok(self.drift(value))
            }
            ExprKind::Rift(inner) => {
                let value = self.eval_expr(inner)?;
                self.output.push_line("⚠ Non-Euclidean expression");
                self.penalize(self.config.rift_expression_cost);
                Ok(value)
            }
            ExprKind::Entangle { name, partner } => {
                self.output.push_line(format!(
                    "⟨⟩ Entangling '{}' with '{}'",
                    name.name, partner.name
                ));
                match self.session.env.get(&partner.name).cloned() {
                    Some(value) => {
                        self.session
                            .env
                            .define(&name.name, Value::Entangled(partner.name.clone()));
                        Ok(value)
                    }
                    None => Ok(Value::Nil),
                }
            }
        }
    }

    fn lookup(&self, name: &str) -> EvalResult<Value> {
        self.session
            .env
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnboundIdentifier {
                name: name.to_string(),
            })
    }

    /// Call an act: arguments are evaluated in the caller's scope, the body
    /// runs in a fresh one.
    fn eval_call(&mut self, name: &Ident, args: &[Expr]) -> EvalResult<Value> {
        let decl = match self.lookup(&name.name)? {
            Value::Act(decl) => decl,
            other => {
                return Err(RuntimeError::NotCallable {
                    name: name.name.clone(),
                    type_name: other.type_name().to_string(),
                })
            }
        };
        if decl.params.len() != args.len() {
            return Err(RuntimeError::ArityMismatch {
                name: name.name.clone(),
                expected: decl.params.len(),
                got: args.len(),
            });
        }

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }

        self.session.env.push_scope();
        for (param, value) in decl.params.iter().zip(values) {
            self.session.env.define(&param.name, value);
        }
        let flow = self.exec_block(&decl.body.stmts);
        self.session.env.pop_scope();

        match flow? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }

    fn eval_binary(&mut self, left: &Expr, op: BinOp, right: &Expr) -> EvalResult<Value> {
        let lv = self.eval_expr(left)?;
        let rv = self.eval_expr(right)?;

        // Phantoms swallow whatever they touch
        if let Value::Phantom(_) = lv {
            return Ok(lv);
        }
        if let Value::Phantom(_) = rv {
            return Ok(rv);
        }

        match op {
            BinOp::Add => self.eval_add(lv, rv),
            BinOp::Sub => eval_arith(&lv, &rv, op, |a, b| a - b),
            BinOp::Mul => eval_arith(&lv, &rv, op, |a, b| a * b),
            BinOp::Div => {
                if let (Value::Number(_), Value::Number(b)) = (&lv, &rv) {
                    if *b == 0.0 {
                        return Err(RuntimeError::DivisionByZero);
                    }
                }
                eval_arith(&lv, &rv, op, |a, b| a / b)
            }
            BinOp::Eq => Ok(Value::Bool(lv.loosely_equals(&rv))),
            BinOp::NotEq => Ok(Value::Bool(!lv.loosely_equals(&rv))),
            BinOp::Less => eval_comparison(&lv, &rv, op, |a, b| a < b),
            BinOp::Greater => eval_comparison(&lv, &rv, op, |a, b| a > b),
            BinOp::LessEq => eval_comparison(&lv, &rv, op, |a, b| a <= b),
            BinOp::GreaterEq => eval_comparison(&lv, &rv, op, |a, b| a >= b),
        }
    }

    fn eval_add(&self, lv: Value, rv: Value) -> EvalResult<Value> {
        match (lv, rv) {
            (Value::String(mut a), Value::String(b)) => {
                let limit = self.config.max_string_bytes;
                if a.len() + b.len() > limit {
                    return Err(RuntimeError::StringTooLong { limit });
                }
                a.push_str(&b);
                Ok(Value::String(a))
            }
            (lv, rv) => eval_arith(&lv, &rv, BinOp::Add, |a, b| a + b),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Entropy-driven behaviour
    // ══════════════════════════════════════════════════════════════════════

    /// Truthiness; superpositions collapse first.
    fn truthy(&mut self, mut value: Value) -> EvalResult<bool> {
        loop {
            match value.is_truthy() {
                Some(b) => return Ok(b),
                None => value = self.collapse(value)?,
            }
        }
    }

    /// Pick one candidate uniformly. An entangled value resolves to its
    /// partner's current value (pallid once the partner is gone), collapsing
    /// that in turn if it is a superposition. Anything else passes through.
    fn collapse(&mut self, value: Value) -> EvalResult<Value> {
        match value {
            Value::Superposition(mut candidates) => {
                if candidates.is_empty() {
                    return Err(RuntimeError::EmptySuperposition);
                }
                let idx = self.session.entropy.next_index(candidates.len());
                Ok(candidates.swap_remove(idx))
            }
            Value::Entangled(partner) => match self.session.env.get(&partner).cloned() {
                Some(superposed @ Value::Superposition(_)) => self.collapse(superposed),
                Some(value) => Ok(value),
                None => Ok(Value::Nil),
            },
            other => Ok(other),
        }
    }

    fn penalize(&mut self, amount: f64) {
        self.session.stability = stability::penalize(self.session.stability, amount);
    }

    /// Grows with logical time and with lost stability, within `[0, 1)`.
    fn drift_factor(&self) -> f64 {
        let time = self.session.entropy.now() as f64;
        let instability = 1.0 - stability::read(self.session.stability) / stability::MAX_STABILITY;
        (time / 100.0).tanh() * instability
    }

    fn drift(&self, value: Value) -> Value {
        let drift = self.drift_factor();
        match value {
            Value::Number(n) => Value::Number(n + drift * 15.0 - 7.5),
            Value::Bool(b) if drift > 0.7 => Value::Bool(!b),
            other => other,
        }
    }

    /// Below the phantom threshold a value may be swapped for a phantom.
    fn maybe_phantom(&mut self, value: Value) -> Value {
        let config = self.config;
        if self.session.stability >= config.phantom_threshold || config.phantom_chance <= 0.0 {
            return value;
        }
        if self.session.entropy.next_f64() >= config.phantom_chance {
            return value;
        }
        let flavor = PHANTOM_FLAVORS[self.session.entropy.next_index(PHANTOM_FLAVORS.len())];
        tracing::debug!(flavor, replaced = value.type_name(), "phantom manifests");
        Value::Phantom(flavor)
    }

    /// Render a value for `echo`, in the voice the current stability allows.
    fn voice(&mut self, value: &Value) -> String {
        let text = value.to_string();
        let current = self.session.stability;
        if current < self.config.dread_threshold {
            format!("𝔈𝔠𝔥𝔬: {}", self.distort(&text))
        } else if current < self.config.unease_threshold {
            format!("Echo: {text}")
        } else {
            text
        }
    }

    fn distort(&mut self, text: &str) -> String {
        text.chars()
            .map(|c| {
                if self.session.entropy.next_f64() < DISTORTION_CHANCE {
                    DISTORTION_GLYPHS[self.session.entropy.next_index(DISTORTION_GLYPHS.len())]
                } else {
                    c
                }
            })
            .collect()
    }
}

fn eval_arith(lv: &Value, rv: &Value, op: BinOp, f: impl Fn(f64, f64) -> f64) -> EvalResult<Value> {
    match (lv, rv) {
        (Value::Number(a), Value::Number(b)) => {
            let result = f(*a, *b);
            if result.is_finite() {
                Ok(Value::Number(result))
            } else {
                Err(RuntimeError::NonFiniteResult {
                    op: op.symbol().to_string(),
                })
            }
        }
        _ => Err(RuntimeError::type_mismatch(format!(
            "cannot apply '{}' to {} and {}",
            op.symbol(),
            lv.type_name(),
            rv.type_name()
        ))),
    }
}

fn eval_comparison(
    lv: &Value,
    rv: &Value,
    op: BinOp,
    f: impl Fn(f64, f64) -> bool,
) -> EvalResult<Value> {
    match (lv, rv) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(f(*a, *b))),
        _ => Err(RuntimeError::type_mismatch(format!(
            "cannot compare {} {} {}",
            lv.type_name(),
            op.symbol(),
            rv.type_name()
        ))),
    }
}
