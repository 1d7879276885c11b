//! Scoped variable environment for the Yellow evaluator.

use crate::value::Value;
use std::collections::BTreeMap;

/// A single scope level.
#[derive(Debug, Clone, Default)]
struct Scope {
    bindings: BTreeMap<String, Value>,
}

/// Scoped variable environment with push/pop semantics.
///
/// Variables are looked up from innermost scope outward.
/// `define` always creates in the current (innermost) scope.
/// `set` and `remove` act on the first scope where the variable exists.
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Environment {
    /// Create a new environment with one global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    /// Push a new scope (for scenes and act invocations).
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Pop the innermost scope. The global scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Number of live scopes, including the global one.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Define a variable in the current (innermost) scope.
    pub fn define(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(name.to_string(), value);
        }
    }

    /// Look up a variable, searching from innermost to outermost scope.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(name))
    }

    /// Update a variable in the first scope where it exists.
    /// Returns `true` if found and updated, `false` if not found.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(slot) = scope.bindings.get_mut(name) {
                *slot = value;
                return true;
            }
        }
        false
    }

    /// Remove a variable from the innermost scope holding it.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.bindings.remove(name))
    }

    /// Names bound in the innermost scope, in sorted order.
    pub fn local_names(&self) -> Vec<String> {
        self.scopes
            .last()
            .map(|scope| scope.bindings.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Get all bindings in the global (outermost) scope.
    pub fn global_bindings(&self) -> &BTreeMap<String, Value> {
        &self.scopes[0].bindings
    }

    /// Drop every scope except a fresh, empty global one.
    pub fn clear(&mut self) {
        self.scopes.clear();
        self.scopes.push(Scope::default());
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
