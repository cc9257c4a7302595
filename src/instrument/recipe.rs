//! Recipe-level progress reporting.

use crate::engine::{RecipeDefinition, RecipeParser, RecipeVariables};
use crate::error::Result;
use crate::ui::RecipeIO;

/// Announces a recipe before it runs and closes it afterwards.
///
/// The closing banner is written even when the recipe fails; the error is
/// then returned unchanged.
pub struct InstrumentedRecipeParser<R> {
    inner: R,
}

impl<R: RecipeParser> InstrumentedRecipeParser<R> {
    /// Wrap `inner`.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: RecipeParser> RecipeParser for InstrumentedRecipeParser<R> {
    fn parse(
        &mut self,
        recipe: &RecipeDefinition,
        variables: RecipeVariables,
        io: &mut dyn RecipeIO,
    ) -> Result<RecipeVariables> {
        io.writeln(&format!("Running recipe \"{}\"", recipe.name()));
        io.writeln("");

        let result = self.inner.parse(recipe, variables, io);

        io.writeln("");
        io.writeln("Execution finished.");

        result
    }
}
