//! Action-level progress reporting.

use crate::engine::{ActionDefinition, ActionParser, BlockResult, RecipeVariables};
use crate::error::Result;
use crate::ui::RecipeIO;

/// Announces each action and reports how it went.
pub struct InstrumentedActionParser<A> {
    inner: A,
}

impl<A: ActionParser> InstrumentedActionParser<A> {
    /// Wrap `inner`.
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

impl<A: ActionParser> ActionParser for InstrumentedActionParser<A> {
    fn parse(
        &mut self,
        action: &ActionDefinition,
        variables: &mut RecipeVariables,
        io: &mut dyn RecipeIO,
    ) -> Result<BlockResult> {
        io.writeln(&format!("  + Running action \"{}\"", action.name()));
        let result = self.inner.parse(action, variables, io)?;
        io.writeln(&result_line(&result));
        Ok(result)
    }
}

/// One-line summary, e.g. `    => OK (2 iterations)`.
pub fn result_line(result: &BlockResult) -> String {
    let status = if result.is_error() { "ERROR" } else { "OK" };
    let noun = if result.iterations == 1 {
        "iteration"
    } else {
        "iterations"
    };
    format!("    => {} ({} {})", status, result.iterations, noun)
}
