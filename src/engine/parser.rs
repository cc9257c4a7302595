//! Recipe, step and action execution.
//!
//! Each level is a trait so callers can wrap a level with another
//! implementation of the same trait. The standard implementations are
//! generic over the level below, so a chain is assembled once:
//!
//! ```text
//! StandardRecipeParser<S: StepParser>
//!   -> StandardStepParser<A: ActionParser>
//!     -> StandardActionParser (ModuleMethodExecutor)
//! ```

use serde_json::Value;

use crate::error::{RecipeRunnerError, Result};
use crate::ui::RecipeIO;

use super::definition::{ActionDefinition, RecipeDefinition, StepDefinition};
use super::interpolation::interpolate_value;
use super::module::ModuleMethodExecutor;
use super::result::BlockResult;
use super::variables::RecipeVariables;

/// Name of the loop variable set while an action iterates.
pub const LOOP_VARIABLE: &str = "item";

/// Runs a whole recipe.
pub trait RecipeParser {
    /// Run every step in order and return the final variables.
    fn parse(
        &mut self,
        recipe: &RecipeDefinition,
        variables: RecipeVariables,
        io: &mut dyn RecipeIO,
    ) -> Result<RecipeVariables>;
}

/// Runs one step.
pub trait StepParser {
    /// Run every action of `step` in order.
    ///
    /// Registered outputs are written into `variables`.
    fn parse(
        &mut self,
        step: &StepDefinition,
        variables: &mut RecipeVariables,
        io: &mut dyn RecipeIO,
    ) -> Result<Vec<BlockResult>>;
}

/// Runs one action.
pub trait ActionParser {
    /// Run `action`. Method failures are reported in the result, not raised.
    fn parse(
        &mut self,
        action: &ActionDefinition,
        variables: &mut RecipeVariables,
        io: &mut dyn RecipeIO,
    ) -> Result<BlockResult>;
}

/// Runs steps in declaration order.
pub struct StandardRecipeParser<S> {
    step_parser: S,
}

impl<S: StepParser> StandardRecipeParser<S> {
    /// Create a recipe parser over `step_parser`.
    pub fn new(step_parser: S) -> Self {
        Self { step_parser }
    }
}

impl<S: StepParser> RecipeParser for StandardRecipeParser<S> {
    fn parse(
        &mut self,
        recipe: &RecipeDefinition,
        mut variables: RecipeVariables,
        io: &mut dyn RecipeIO,
    ) -> Result<RecipeVariables> {
        for step in recipe.steps() {
            self.step_parser.parse(step, &mut variables, io)?;
        }
        Ok(variables)
    }
}

/// Runs actions in order, stopping at the first failure not ignored.
pub struct StandardStepParser<A> {
    action_parser: A,
}

impl<A: ActionParser> StandardStepParser<A> {
    /// Create a step parser over `action_parser`.
    pub fn new(action_parser: A) -> Self {
        Self { action_parser }
    }
}

impl<A: ActionParser> StepParser for StandardStepParser<A> {
    fn parse(
        &mut self,
        step: &StepDefinition,
        variables: &mut RecipeVariables,
        io: &mut dyn RecipeIO,
    ) -> Result<Vec<BlockResult>> {
        let mut results = Vec::with_capacity(step.actions().len());

        for action in step.actions() {
            let result = self.action_parser.parse(action, variables, io)?;

            if let Some(message) = &result.error {
                if !action.ignore_errors() {
                    return Err(RecipeRunnerError::ActionFailed {
                        step: step.name().to_string(),
                        action: action.name().to_string(),
                        message: message.clone(),
                    });
                }
                tracing::debug!("Ignoring failure of action '{}'", action.name());
            }

            results.push(result);
        }

        Ok(results)
    }
}

/// Calls module methods, handling `foreach` and `register`.
pub struct StandardActionParser {
    executor: ModuleMethodExecutor,
}

impl StandardActionParser {
    /// Create an action parser dispatching through `executor`.
    pub fn new(executor: ModuleMethodExecutor) -> Self {
        Self { executor }
    }
}

impl ActionParser for StandardActionParser {
    fn parse(
        &mut self,
        action: &ActionDefinition,
        variables: &mut RecipeVariables,
        io: &mut dyn RecipeIO,
    ) -> Result<BlockResult> {
        let result = match action.foreach() {
            None => {
                let params = interpolate_value(action.params(), variables)?;
                match self
                    .executor
                    .run_method(action.method(), &params, variables, io)
                {
                    Ok(output) => BlockResult::ok(1, output),
                    Err(e) => BlockResult::failed(1, e.to_string()),
                }
            }
            Some(items) => {
                let items = match interpolate_value(items, variables)? {
                    Value::Array(items) => items,
                    _ => {
                        return Err(RecipeRunnerError::InvalidAction {
                            action: action.name().to_string(),
                            message: "\"foreach\" must evaluate to a list".to_string(),
                        })
                    }
                };
                self.iterate(action, items, variables, io)?
            }
        };

        if let Some(name) = action.register() {
            if !result.is_error() {
                variables.insert(name, result.output.clone());
            }
        }

        Ok(result)
    }
}

impl StandardActionParser {
    fn iterate(
        &mut self,
        action: &ActionDefinition,
        items: Vec<Value>,
        variables: &RecipeVariables,
        io: &mut dyn RecipeIO,
    ) -> Result<BlockResult> {
        let mut outputs = Vec::with_capacity(items.len());
        let mut scope = variables.clone();

        for (index, item) in items.into_iter().enumerate() {
            scope.insert(LOOP_VARIABLE, item);
            let params = interpolate_value(action.params(), &scope)?;

            match self
                .executor
                .run_method(action.method(), &params, &scope, io)
            {
                Ok(output) => outputs.push(output),
                Err(e) => return Ok(BlockResult::failed(index + 1, e.to_string())),
            }
        }

        Ok(BlockResult::ok(outputs.len(), Value::Array(outputs)))
    }
}
