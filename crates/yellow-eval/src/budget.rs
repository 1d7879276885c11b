//! Per-run execution budget: recursion depth and total evaluation steps.

use crate::error::{EvalResult, RuntimeError};

#[derive(Debug, Clone)]
pub struct ExecutionBudget {
    depth: u32,
    max_depth: u32,
    steps: u64,
    max_steps: u64,
}

impl ExecutionBudget {
    pub fn new(max_depth: u32, max_steps: u64) -> Self {
        Self {
            depth: 0,
            max_depth,
            steps: 0,
            max_steps,
        }
    }

    /// Descend one level. Fails once the depth ceiling is crossed, leaving
    /// the counter unchanged.
    pub fn enter(&mut self) -> EvalResult<()> {
        if self.depth >= self.max_depth {
            return Err(RuntimeError::RecursionLimitExceeded {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Consume one unit of gas.
    pub fn step(&mut self) -> EvalResult<()> {
        self.steps += 1;
        if self.steps > self.max_steps {
            Err(RuntimeError::StepLimitExceeded {
                limit: self.max_steps,
            })
        } else {
            Ok(())
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}
