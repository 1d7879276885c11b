//! Runtime values.

use std::fmt;
use std::rc::Rc;
use yellow_types::ast::ActDecl;

/// Tolerance for numeric equality.
pub const NUMBER_EPSILON: f64 = 1e-4;

/// Flavors a phantom can take when it replaces a value.
pub const PHANTOM_FLAVORS: &[&str] = &["shadow", "echo", "whisper", "void", "fragment"];

#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    String(String),
    Bool(bool),
    /// `pallid`
    Nil,
    /// A callable definition. Shared, never copied.
    Act(Rc<ActDecl>),
    /// Uncollapsed candidates.
    Superposition(Vec<Value>),
    /// Injected under low stability; absorbs every operation it touches.
    Phantom(&'static str),
    /// Bound by `entangle`; collapsing it reads the partner's current value.
    Entangled(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Nil => "pallid",
            Value::Act(_) => "act",
            Value::Superposition(_) => "superposition",
            Value::Phantom(_) => "phantom",
            Value::Entangled(_) => "entangled",
        }
    }

    /// Truthiness for everything except superpositions, which must be
    /// collapsed first and yield `None` here.
    pub fn is_truthy(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => Some(*n != 0.0),
            Value::Nil | Value::Phantom(_) => Some(false),
            Value::String(s) => Some(!s.is_empty()),
            Value::Act(_) | Value::Entangled(_) => Some(true),
            Value::Superposition(_) => None,
        }
    }

    /// Equality between same-kind values. Values of different kinds are
    /// never equal.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => (a - b).abs() < NUMBER_EPSILON,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Act(a), Value::Act(b)) => Rc::ptr_eq(a, b),
            (Value::Superposition(a), Value::Superposition(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loosely_equals(y))
            }
            (Value::Phantom(a), Value::Phantom(b)) => a == b,
            (Value::Entangled(a), Value::Entangled(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.loosely_equals(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::String(s) => f.write_str(s),
            Value::Bool(true) => f.write_str("yellow"),
            Value::Bool(false) => f.write_str("tattered"),
            Value::Nil => f.write_str("pallid"),
            Value::Act(decl) => write!(f, "<act {}>", decl.name.name),
            Value::Superposition(items) => write!(f, "<superposed: {} possibilities>", items.len()),
            Value::Phantom(flavor) => write!(f, "<phantom:{flavor}>"),
            Value::Entangled(partner) => write!(f, "<entangled with {partner}>"),
        }
    }
}
