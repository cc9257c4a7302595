//! Step-level progress reporting.

use crate::engine::{BlockResult, RecipeVariables, StepDefinition, StepParser};
use crate::error::Result;
use crate::ui::RecipeIO;

/// Announces each step before it runs.
pub struct InstrumentedStepParser<S> {
    inner: S,
}

impl<S: StepParser> InstrumentedStepParser<S> {
    /// Wrap `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: StepParser> StepParser for InstrumentedStepParser<S> {
    fn parse(
        &mut self,
        step: &StepDefinition,
        variables: &mut RecipeVariables,
        io: &mut dyn RecipeIO,
    ) -> Result<Vec<BlockResult>> {
        io.writeln(&format!("- Running step \"{}\"", step.name()));
        self.inner.parse(step, variables, io)
    }
}
