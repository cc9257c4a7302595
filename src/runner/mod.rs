//! Run orchestration.
//!
//! [`RunRecipeCommand`] ties the pieces together:
//!
//! 1. derive the recipe name from its file name
//! 2. read the packages the recipe declares
//! 3. lock, update and activate the recipe's environment (only when
//!    packages are declared)
//! 4. merge common and caller variables
//! 5. run the recipe through the instrumented engine

pub mod command;
pub mod manager;
pub mod name;
pub mod variables;

pub use command::RunRecipeCommand;
pub use manager::{EngineRecipeRunnerManager, RecipeRunnerManager, PACKAGES_EXTRA_PATH};
pub use name::{RecipeNameExtractor, RECIPE_EXTENSION};
pub use variables::{
    CommonRecipeVariableGenerator, CurrentDirectoryProvider, FixedCurrentDirectory,
    ProcessCurrentDirectory,
};
