//! Built-in recipe engine.
//!
//! Parses YAML recipes and runs them step by step, calling module methods
//! for each action. The orchestration layer only talks to the engine
//! through the parser traits in [`parser`] and the [`ModuleRegistry`].

pub mod definition;
pub mod interpolation;
pub mod module;
pub mod modules;
pub mod parser;
pub mod result;
pub mod variables;

pub use definition::{ActionDefinition, Extra, RecipeDefinition, StepDefinition};
pub use interpolation::{interpolate_str, interpolate_value, parse_interpolation, Segment};
pub use module::{
    MethodContext, Module, ModuleFactory, ModuleMethodExecutor, ModuleRegistry,
    FILESYSTEM_MODULE_ID,
};
pub use modules::{EssentialModule, FilesystemModule};
pub use parser::{
    ActionParser, RecipeParser, StandardActionParser, StandardRecipeParser, StandardStepParser,
    StepParser, LOOP_VARIABLE,
};
pub use result::BlockResult;
pub use variables::{standard_variables, RecipeVariables};
