//! The stability metric: decays per executed statement, read by the host.

use crate::entropy::EntropySource;

pub const MAX_STABILITY: f64 = 100.0;

/// How much stability one statement costs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayPolicy {
    /// Fixed cost per statement.
    pub base: f64,
    /// Extra cost scaled by one entropy draw. Zero means no draw is taken.
    pub jitter: f64,
}

impl Default for DecayPolicy {
    fn default() -> Self {
        Self {
            base: 0.08,
            jitter: 0.0,
        }
    }
}

/// Charge one statement's worth of decay.
pub fn apply_decay(current: f64, policy: &DecayPolicy, entropy: &mut EntropySource) -> f64 {
    let mut cost = policy.base;
    if policy.jitter > 0.0 {
        cost += policy.jitter * entropy.next_f64();
    }
    read(current - cost)
}

/// Clamp to `[0, 100]`. NaN reads as 0.
pub fn read(current: f64) -> f64 {
    if current.is_nan() {
        0.0
    } else {
        current.clamp(0.0, MAX_STABILITY)
    }
}

/// Add `amount` back, never past the maximum.
pub fn restore(current: f64, amount: f64) -> f64 {
    read(current + amount)
}

/// Subtract a one-off penalty.
pub fn penalize(current: f64, amount: f64) -> f64 {
    read(current - amount)
}
