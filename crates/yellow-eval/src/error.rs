//! Error types for the Yellow evaluator and engine.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;
use yellow_types::{ErrorCode, ParseError};

/// Evaluation error. Aborts the current run; the engine stays usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("unbound identifier '{name}'")]
    UnboundIdentifier { name: String },

    #[error("type mismatch: {message}")]
    TypeMismatch { message: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("recursion limit exceeded: nesting deeper than {limit}")]
    RecursionLimitExceeded { limit: u32 },

    #[error("step limit exceeded: more than {limit} evaluation steps")]
    StepLimitExceeded { limit: u64 },

    #[error("act '{name}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("'{name}' is not callable (it is {type_name})")]
    NotCallable { name: String, type_name: String },

    /// Arithmetic that would produce NaN or an infinity.
    #[error("'{op}' produced a non-finite result")]
    NonFiniteResult { op: String },

    #[error("cannot collapse an empty superposition")]
    EmptySuperposition,

    #[error("stability depleted")]
    StabilityDepleted,

    #[error("string longer than {limit} bytes")]
    StringTooLong { limit: usize },
}

impl RuntimeError {
    pub(crate) fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            message: message.into(),
        }
    }

    /// Stable error code for hosts.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnboundIdentifier { .. } => ErrorCode::UNBOUND_IDENTIFIER,
            Self::TypeMismatch { .. } => ErrorCode::TYPE_MISMATCH,
            Self::DivisionByZero => ErrorCode::DIVISION_BY_ZERO,
            Self::RecursionLimitExceeded { .. } => ErrorCode::RECURSION_LIMIT,
            Self::StepLimitExceeded { .. } => ErrorCode::STEP_LIMIT,
            Self::ArityMismatch { .. } => ErrorCode::ARITY_MISMATCH,
            Self::NotCallable { .. } => ErrorCode::NOT_CALLABLE,
            Self::NonFiniteResult { .. } => ErrorCode::NON_FINITE_RESULT,
            Self::EmptySuperposition => ErrorCode::EMPTY_SUPERPOSITION,
            Self::StabilityDepleted => ErrorCode::STABILITY_DEPLETED,
            Self::StringTooLong { .. } => ErrorCode::STRING_TOO_LONG,
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Any failure surfaced by [`crate::Engine`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl EngineError {
    /// The pipeline stage that failed: `"parse"` or `"runtime"`.
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::Runtime(_) => "runtime",
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Parse(e) => e.code(),
            Self::Runtime(e) => e.code(),
        }
    }
}

/// Hosts see `{ "phase", "code", "message" }`.
impl Serialize for EngineError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("EngineError", 3)?;
        s.serialize_field("phase", self.phase())?;
        s.serialize_field("code", &self.code().to_string())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}
