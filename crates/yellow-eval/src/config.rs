//! Engine tuning parameters.
//!
//! Every field has a default, so a host may send a partial JSON document
//! and override only what it cares about.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use yellow_types::ErrorCode;

use crate::stability::{DecayPolicy, MAX_STABILITY};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::INVALID_CONFIG
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Deepest statement/expression nesting the evaluator descends into.
    pub max_depth: u32,
    /// Evaluation steps allowed per run.
    pub max_steps: u64,
    /// `hastur` iterations before the loop is broken off.
    pub max_loop_iterations: u32,

    pub initial_stability: f64,
    pub decay_per_statement: f64,
    pub decay_jitter: f64,

    /// Below this stability, `mask`/`echo` values may turn into phantoms.
    pub phantom_threshold: f64,
    pub phantom_chance: f64,
    /// Below this stability, echoes gain a prefix.
    pub unease_threshold: f64,
    /// Below this stability, echoes are distorted.
    pub dread_threshold: f64,

    pub anchor_restore: f64,
    pub runaway_loop_penalty: f64,
    /// Charged after every `hastur` iteration, on top of statement decay.
    pub loop_iteration_decay: f64,
    /// Charged by each `rift` loop iteration.
    pub rift_iteration_cost: f64,
    /// Charged by each `rift(expr)`.
    pub rift_expression_cost: f64,
    /// Charged by `infect`.
    pub infection_cost: f64,
    /// Charged when `rewrite name;` lands on a tenth logical tick.
    pub fray_cost: f64,

    pub whisper_cost: f64,
    pub max_whispers_per_run: u32,
    pub max_whisper_len: usize,
    pub max_whisper_statements: usize,
    pub forbidden_whisper_words: Vec<String>,

    /// Fragments kept per name by `remember`.
    pub max_fragments: usize,
    pub max_output_bytes: usize,
    /// Longest string a concatenation may produce.
    pub max_string_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: 100,
            max_steps: 100_000,
            max_loop_iterations: 1000,
            initial_stability: 100.0,
            decay_per_statement: 0.08,
            decay_jitter: 0.0,
            phantom_threshold: 20.0,
            phantom_chance: 0.05,
            unease_threshold: 50.0,
            dread_threshold: 20.0,
            anchor_restore: 10.0,
            runaway_loop_penalty: 20.0,
            loop_iteration_decay: 0.5,
            rift_iteration_cost: 1.0,
            rift_expression_cost: 2.0,
            infection_cost: 3.0,
            fray_cost: 2.0,
            whisper_cost: 5.0,
            max_whispers_per_run: 10,
            max_whisper_len: 1000,
            max_whisper_statements: 10,
            forbidden_whisper_words: ["whisper", "infect", "rift", "carcosa", "system"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_fragments: 10,
            max_output_bytes: 10_000,
            max_string_bytes: 100_000,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(invalid("max_depth must be at least 1"));
        }
        if self.max_steps == 0 {
            return Err(invalid("max_steps must be at least 1"));
        }

        let tunings = [
            ("decay_per_statement", self.decay_per_statement),
            ("decay_jitter", self.decay_jitter),
            ("phantom_threshold", self.phantom_threshold),
            ("unease_threshold", self.unease_threshold),
            ("dread_threshold", self.dread_threshold),
            ("anchor_restore", self.anchor_restore),
            ("runaway_loop_penalty", self.runaway_loop_penalty),
            ("loop_iteration_decay", self.loop_iteration_decay),
            ("rift_iteration_cost", self.rift_iteration_cost),
            ("rift_expression_cost", self.rift_expression_cost),
            ("infection_cost", self.infection_cost),
            ("fray_cost", self.fray_cost),
            ("whisper_cost", self.whisper_cost),
        ];
        for (name, value) in tunings {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!(
                    "{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.phantom_chance) {
            return Err(invalid(format!(
                "phantom_chance must be within [0, 1] (got {})",
                self.phantom_chance
            )));
        }
        if !(0.0..=MAX_STABILITY).contains(&self.initial_stability) {
            return Err(invalid(format!(
                "initial_stability must be within [0, 100] (got {})",
                self.initial_stability
            )));
        }
        Ok(())
    }

    pub fn decay_policy(&self) -> DecayPolicy {
        DecayPolicy {
            base: self.decay_per_statement,
            jitter: self.decay_jitter,
        }
    }

    /// The first forbidden word found in `code`, compared case-insensitively.
    pub(crate) fn forbidden_word_in(&self, code: &str) -> Option<&str> {
        let lowered = code.to_lowercase();
        self.forbidden_whisper_words
            .iter()
            .find(|w| lowered.contains(&w.to_lowercase()))
            .map(String::as_str)
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}
