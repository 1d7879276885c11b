//! Contagion planted by `infect`: per-name virulence that corrupts reads.

use crate::entropy::EntropySource;
use crate::value::Value;
use std::collections::BTreeMap;

/// Above this virulence an infected boolean always reads inverted.
pub const FLIP_VIRULENCE: f64 = 0.7;

/// Infected names and their virulence in `[0, 1]`.
///
/// Infection is attached to the name, not the value: rebinding an infected
/// name keeps it infected. Only an engine reset cures it.
#[derive(Debug, Clone, Default)]
pub struct Infections {
    by_name: BTreeMap<String, f64>,
}

impl Infections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Infect `name`. A weaker strain never replaces a stronger one.
    pub fn infect(&mut self, name: &str, virulence: f64) {
        let virulence = virulence.clamp(0.0, 1.0);
        let slot = self.by_name.entry(name.to_string()).or_insert(0.0);
        if virulence > *slot {
            *slot = virulence;
        }
    }

    pub fn virulence(&self, name: &str) -> Option<f64> {
        self.by_name.get(name).copied()
    }

    pub fn is_infected(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// The value a read of `name` actually sees.
    ///
    /// Numbers are scaled by a draw in `1 ± virulence/2`; booleans flip once
    /// virulence passes [`FLIP_VIRULENCE`]. Healthy names and other values
    /// pass through without consuming entropy.
    pub fn corrupt(&self, name: &str, value: Value, entropy: &mut EntropySource) -> Value {
        let Some(virulence) = self.virulence(name) else {
            return value;
        };
        match value {
            Value::Number(n) => {
                let scaled = n * (1.0 + (entropy.next_f64() - 0.5) * virulence);
                Value::Number(scaled)
            }
            Value::Bool(b) if virulence > FLIP_VIRULENCE => Value::Bool(!b),
            other => other,
        }
    }
}
