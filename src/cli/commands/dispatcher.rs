//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::RecipeIO;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, writing through `io`.
    fn execute(&self, io: &mut dyn RecipeIO) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    current_dir: PathBuf,
}

impl CommandDispatcher {
    /// Create a dispatcher for a process started in `current_dir`.
    pub fn new(current_dir: PathBuf) -> Self {
        Self { current_dir }
    }

    /// The directory the process was started from.
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, io: &mut dyn RecipeIO) -> Result<CommandResult> {
        match &cli.command {
            Commands::Run(args) => {
                let cmd = super::run::RunCommand::new(&self.current_dir, args.clone());
                cmd.execute(io)
            }
        }
    }
}
