//! The embedding-safe engine facade.
//!
//! Owns everything that persists between runs (bindings, entropy, stability,
//! memory fragments, infections) and guarantees the instance is callable again after
//! every run, whatever the source text did.

use serde::Serialize;
use std::fmt;
use yellow_types::{Excerpt, SourceFile};

use crate::budget::ExecutionBudget;
use crate::config::{ConfigError, EngineConfig};
use crate::error::EngineError;
use crate::evaluator::Evaluator;
use crate::output::OutputBuffer;
use crate::session::Session;
use crate::stability;
use crate::value::Value;

/// Lifecycle of an [`Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    /// Constructed or reset; nothing has run yet.
    Fresh,
    /// Inside [`Engine::run`].
    Running,
    /// At least one run has completed, successfully or not.
    Ready,
}

/// The result of one [`Engine::run`].
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// Lines printed before the run ended, joined with `\n`.
    pub output: String,
    pub error: Option<EngineError>,
    /// Stability after the run, clamped to `[0, 100]`.
    pub stability: f64,
    /// Evaluation steps the run consumed.
    pub steps: u64,
    pub logical_time: u64,
    /// Whether output was cut off at the byte cap.
    pub truncated: bool,
    /// The source line a parse error points at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_line: Option<Excerpt>,
}

impl RunOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Output text, followed by an `error[E…]: …` line when the run failed
    /// and, for parse errors, the offending line with a caret under it.
    pub fn render(&self) -> String {
        match &self.error {
            None => self.output.clone(),
            Some(err) => {
                let mut line = format!("error[{}]: {err}", err.code());
                if let Some(excerpt) = &self.source_line {
                    line.push('\n');
                    line.push_str(&excerpt.render());
                }
                if self.output.is_empty() {
                    line
                } else {
                    format!("{}\n{line}", self.output)
                }
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Restores `Ready` on every exit path from a run.
struct ReadyGuard<'a>(&'a mut EngineState);

impl Drop for ReadyGuard<'_> {
    fn drop(&mut self) {
        *self.0 = EngineState::Ready;
    }
}

/// A long-lived, reusable interpreter instance.
pub struct Engine {
    config: EngineConfig,
    seed: u64,
    session: Session,
    state: EngineState,
}

impl Engine {
    /// Create an engine with default tuning.
    pub fn with_seed(seed: u64) -> Self {
        let config = EngineConfig::default();
        Self {
            session: Session::new(&config, seed),
            config,
            seed,
            state: EngineState::Fresh,
        }
    }

    /// Create an engine with custom tuning.
    pub fn with_config(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            session: Session::new(&config, seed),
            config,
            seed,
            state: EngineState::Fresh,
        })
    }

    /// Parse and execute `source` against the persistent environment.
    ///
    /// Never panics on bad input: parse and runtime failures come back in
    /// [`RunOutcome::error`] alongside whatever was printed first.
    #[tracing::instrument(level = "debug", skip_all, fields(source_len = source.len()))]
    pub fn run(&mut self, source: &str) -> RunOutcome {
        let Engine {
            config,
            session,
            state,
            ..
        } = self;
        *state = EngineState::Running;
        let _ready = ReadyGuard(state);

        let mut budget = ExecutionBudget::new(config.max_depth, config.max_steps);
        let file = SourceFile::anonymous(source);
        let mut source_line = None;
        let (output, error) = match yellow_parser::parse_source(&file) {
            Err(e) => {
                source_line = file.excerpt(e.span());
                (OutputBuffer::default(), Some(EngineError::from(e)))
            }
            Ok(stmts) => {
                let mut evaluator = Evaluator::new(session, &mut budget, config);
                let result = evaluator.execute(&stmts);
                (evaluator.finish(), result.err().map(EngineError::from))
            }
        };

        if let Some(err) = &error {
            tracing::debug!(phase = err.phase(), code = %err.code(), "run failed");
        }

        RunOutcome {
            truncated: output.is_truncated(),
            output: output.into_text(),
            error,
            stability: stability::read(session.stability),
            steps: budget.steps(),
            logical_time: session.entropy.now(),
            source_line,
        }
    }

    /// [`Engine::run`], rendered as text.
    pub fn run_text(&mut self, source: &str) -> String {
        self.run(source).render()
    }

    /// Current stability, always within `[0, 100]`.
    pub fn stability(&self) -> f64 {
        stability::read(self.session.stability)
    }

    /// Discard bindings, fragments, infections and stability; reseed with the
    /// construction seed.
    pub fn reset(&mut self) {
        tracing::debug!(seed = self.seed, "engine reset");
        self.session = Session::new(&self.config, self.seed);
        self.state = EngineState::Fresh;
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn logical_time(&self) -> u64 {
        self.session.entropy.now()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the tuning. Limits apply from the next run; a new
    /// `initial_stability` applies from the next reset.
    pub fn set_config(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// [`Engine::set_config`] from a JSON document. On error the previous
    /// configuration stays in place.
    pub fn configure_json(&mut self, json: &str) -> Result<(), ConfigError> {
        let config = EngineConfig::from_json(json)?;
        self.set_config(config)
    }

    /// Look up a global binding.
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.session.env.global_bindings().get(name)
    }

    /// Number of fragments remembered under `name`.
    pub fn fragment_count(&self, name: &str) -> usize {
        self.session.fragments.count(name)
    }

    /// Whether `name` carries an infection.
    pub fn is_infected(&self, name: &str) -> bool {
        self.session.infections.is_infected(name)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_seed(0)
    }
}
