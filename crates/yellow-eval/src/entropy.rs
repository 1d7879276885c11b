//! Deterministic entropy: a seeded xorshift64 generator plus a logical clock.
//!
//! Nothing in the evaluator reads host time or host randomness. The seed is
//! taken once, at engine construction, and every draw after that is a pure
//! function of it.

/// Replacement for a zero seed. Zero is a fixed point of xorshift.
const ZERO_SEED_REPLACEMENT: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntropySource {
    state: u64,
    logical_time: u64,
}

impl EntropySource {
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 {
            ZERO_SEED_REPLACEMENT
        } else {
            seed
        };
        Self {
            state,
            logical_time: 0,
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        // top 53 bits fill the mantissa exactly
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }

    /// Advance the logical clock by one and return the new time.
    pub fn tick(&mut self) -> u64 {
        self.logical_time += 1;
        self.logical_time
    }

    /// Current logical time.
    pub fn now(&self) -> u64 {
        self.logical_time
    }
}
