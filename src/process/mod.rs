//! Process port: run external programs and locate executables.

use std::path::{Path, PathBuf};

use crate::error::{RecipeRunnerError, Result};
use crate::shell::{self, CommandOptions};
use crate::ui::{RecipeIO, Verbosity};

/// Capability to run external programs.
pub trait Process {
    /// Run `program` with `args` inside `working_dir` and wait for it.
    ///
    /// Output is forwarded line by line to `io` at verbose level. A non-zero
    /// exit is an error.
    fn run(
        &self,
        program: &Path,
        args: &[String],
        working_dir: &Path,
        io: &mut dyn RecipeIO,
    ) -> Result<()>;

    /// Locate an executable by name.
    fn find_executable(&self, name: &str) -> Option<PathBuf>;
}

/// [`Process`] backed by the operating system.
#[derive(Debug, Clone, Default)]
pub struct SystemProcess {
    search_path: Option<Vec<PathBuf>>,
}

impl SystemProcess {
    /// Create a process adapter that searches the system `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a process adapter that searches only `dirs`.
    pub fn with_search_path(dirs: Vec<PathBuf>) -> Self {
        Self {
            search_path: Some(dirs),
        }
    }
}

impl Process for SystemProcess {
    fn run(
        &self,
        program: &Path,
        args: &[String],
        working_dir: &Path,
        io: &mut dyn RecipeIO,
    ) -> Result<()> {
        let options = CommandOptions {
            cwd: Some(working_dir.to_path_buf()),
            ..Default::default()
        };

        let result = shell::execute_streaming(program, args, &options, |line| {
            io.write(line.text(), true, Verbosity::Verbose);
        })?;

        if !result.success {
            return Err(RecipeRunnerError::CommandFailed {
                command: shell::display_command(&program.to_string_lossy(), args),
                code: result.exit_code,
            });
        }

        Ok(())
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        match &self.search_path {
            Some(dirs) => shell::find_executable(name, dirs),
            None => shell::find_executable(name, &shell::system_search_path()),
        }
    }
}
