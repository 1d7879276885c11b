//! Yellow tree-walking evaluator and engine facade.
//!
//! [`Engine`] is the entry point for hosts: it parses source text, walks the
//! AST against a persistent environment, and reports output, errors and the
//! stability metric. Evaluation is deterministic for a given seed and
//! sequence of runs.

mod budget;
mod config;
mod engine;
mod entropy;
mod env;
mod error;
mod evaluator;
mod fragments;
mod infection;
mod output;
mod session;
pub mod stability;
mod value;

pub use budget::ExecutionBudget;
pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, EngineState, RunOutcome};
pub use entropy::EntropySource;
pub use env::Environment;
pub use error::{EngineError, EvalResult, RuntimeError};
pub use evaluator::{Evaluator, Flow};
pub use fragments::Fragments;
pub use infection::Infections;
pub use output::OutputBuffer;
pub use session::Session;
pub use stability::DecayPolicy;
pub use value::{Value, PHANTOM_FLAVORS};

/// Crate version, reported to hosts.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
