//! Recipe Runner - run YAML recipes with per-recipe module environments.
//!
//! A recipe may declare packages under `extra.rr.packages`. Those packages
//! are installed by an external package manager into a private environment
//! at `<working dir>/.rr/<recipe name>/`, refreshed only when the declared
//! set changes. The modules they provide are then loaded and the recipe is
//! run with progress reported per recipe, step and action.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`dependency`] - Manifests, lock files and recipe environments
//! - [`engine`] - Recipe definitions, variables, modules and parsers
//! - [`error`] - Error types and result aliases
//! - [`instrument`] - Progress-reporting decorators and the margin sink
//! - [`process`] - Running external programs
//! - [`runner`] - Run orchestration
//! - [`shell`] - Command execution helpers
//! - [`ui`] - Terminal output and prompts
//! - [`workspace`] - Working directory and filesystem access
//!
//! # Example
//!
//! ```
//! use recipe_runner::dependency::ActivatedEnvironment;
//! use recipe_runner::engine::{
//!     ModuleMethodExecutor, RecipeDefinition, RecipeParser, RecipeVariables,
//! };
//! use recipe_runner::instrument::{instrumented_parser, Margin};
//! use recipe_runner::ui::MockIO;
//!
//! let recipe = RecipeDefinition::from_yaml(
//!     "name: hello\nsteps:\n  - name: greet\n    actions:\n      - name: say\n        write: hi\n",
//! ).unwrap();
//! let executor = ModuleMethodExecutor::new(
//!     Vec::new(),
//!     ActivatedEnvironment::default(),
//!     Margin::default(),
//! );
//! let mut io = MockIO::new();
//!
//! instrumented_parser(executor).parse(&recipe, RecipeVariables::new(), &mut io).unwrap();
//! assert!(io.has_line("     >hi"));
//! ```

pub mod cli;
pub mod dependency;
pub mod engine;
pub mod error;
pub mod instrument;
pub mod process;
pub mod runner;
pub mod shell;
pub mod ui;
pub mod workspace;

pub use error::{RecipeRunnerError, Result};
