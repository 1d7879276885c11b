//! State an engine carries from one run to the next.

use crate::config::EngineConfig;
use crate::entropy::EntropySource;
use crate::env::Environment;
use crate::fragments::Fragments;
use crate::infection::Infections;
use crate::stability;

#[derive(Debug, Clone)]
pub struct Session {
    pub env: Environment,
    pub entropy: EntropySource,
    /// Raw stability. Read it through [`stability::read`].
    pub stability: f64,
    pub fragments: Fragments,
    pub infections: Infections,
}

impl Session {
    pub fn new(config: &EngineConfig, seed: u64) -> Self {
        Self {
            env: Environment::new(),
            entropy: EntropySource::new(seed),
            stability: stability::read(config.initial_stability),
            fragments: Fragments::new(),
            infections: Infections::new(),
        }
    }
}
