//! Command-line interface for Recipe Runner.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, RunArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
