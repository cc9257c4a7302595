//! Outcome of running one action.

use serde_json::Value;

/// What an action reported after all its iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockResult {
    /// Number of times the method was called.
    pub iterations: usize,

    /// Failure message of the last iteration, if it failed.
    pub error: Option<String>,

    /// Method output; a list when the action iterated.
    pub output: Value,
}

impl BlockResult {
    /// A successful result.
    pub fn ok(iterations: usize, output: Value) -> Self {
        Self {
            iterations,
            error: None,
            output,
        }
    }

    /// A failed result.
    pub fn failed(iterations: usize, message: impl Into<String>) -> Self {
        Self {
            iterations,
            error: Some(message.into()),
            output: Value::Null,
        }
    }

    /// Check if the action failed.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
