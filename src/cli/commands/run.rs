//! Run command implementation.
//!
//! The `rr run` command executes one recipe file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::args::RunArgs;
use crate::dependency::DependencyManager;
use crate::engine::RecipeVariables;
use crate::error::{RecipeRunnerError, Result};
use crate::instrument::Margin;
use crate::process::SystemProcess;
use crate::runner::{
    CommonRecipeVariableGenerator, EngineRecipeRunnerManager, ProcessCurrentDirectory,
    RecipeNameExtractor, RunRecipeCommand,
};
use crate::ui::RecipeIO;
use crate::workspace::{OsFilesystem, WorkingDirectory};

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    current_dir: PathBuf,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(current_dir: &Path, args: RunArgs) -> Self {
        Self {
            current_dir: current_dir.to_path_buf(),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Directory recipes and environments are resolved against.
    ///
    /// The recipe's own directory when the path has one, otherwise the
    /// current directory.
    pub fn working_dir(&self) -> PathBuf {
        match self.args.recipe.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.current_dir.join(parent),
            _ => self.current_dir.clone(),
        }
    }

    /// The recipe's file name without directories.
    pub fn recipe_filename(&self) -> Result<String> {
        self.args
            .recipe
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| RecipeRunnerError::InvalidRecipeFilename {
                filename: self.args.recipe.display().to_string(),
            })
    }
}

impl Command for RunCommand {
    fn execute(&self, io: &mut dyn RecipeIO) -> Result<CommandResult> {
        let margin = Margin::new(self.args.margin)?;
        let variables = RecipeVariables::from_assignments(self.args.vars.as_slice())?;
        let recipe_filename = self.recipe_filename()?;
        let root = self.working_dir();

        tracing::debug!(
            "Running {} from working directory {}",
            recipe_filename,
            root.display()
        );

        let working_directory = WorkingDirectory::new(&root, Arc::new(OsFilesystem))?;
        let dependency_manager =
            DependencyManager::new(SystemProcess::new(), working_directory.clone());
        let runner_manager = EngineRecipeRunnerManager::new(working_directory).with_margin(margin);
        let variable_generator =
            CommonRecipeVariableGenerator::new(&root, Box::new(ProcessCurrentDirectory));

        let mut command = RunRecipeCommand::new(
            dependency_manager,
            runner_manager,
            RecipeNameExtractor::new(),
            variable_generator,
        );
        command.execute(&recipe_filename, variables, io)?;

        Ok(CommandResult::success())
    }
}
