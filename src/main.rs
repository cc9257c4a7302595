//! Recipe Runner CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use recipe_runner::cli::{Cli, CommandDispatcher};
use recipe_runner::ui::{ConsoleIO, Verbosity};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr so they never mix with recipe output.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("recipe_runner=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("recipe_runner=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Map a command's exit code onto a process status byte.
///
/// Codes outside `0..=255` become 1.
fn exit_status(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("Recipe Runner starting with args: {:?}", cli);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let mut io = ConsoleIO::new(verbosity, !cli.no_interaction);

    let current_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            io.error(&format!("Error: cannot read current directory: {}", e));
            return ExitCode::from(1);
        }
    };

    let dispatcher = CommandDispatcher::new(current_dir);

    match dispatcher.dispatch(&cli, &mut io) {
        Ok(result) => ExitCode::from(exit_status(result.exit_code)),
        Err(e) => {
            io.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
