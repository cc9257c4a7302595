//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::instrument::DEFAULT_MARGIN;

/// Recipe Runner - run YAML recipes with per-recipe module environments.
#[derive(Debug, Parser)]
#[command(name = "rr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase output detail (-v verbose, -vv very verbose, -vvv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Minimal output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Never ask questions; use default answers
    #[arg(short = 'n', long, global = true)]
    pub no_interaction: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a recipe
    Run(RunArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Recipe file (must end in .yml)
    pub recipe: PathBuf,

    /// Recipe variable as KEY=VALUE (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,

    /// Spaces before module output
    #[arg(long, default_value_t = DEFAULT_MARGIN as i64, allow_negative_numbers = true)]
    pub margin: i64,
}
