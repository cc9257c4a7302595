//! Variables every recipe run starts with.

use std::path::{Path, PathBuf};

use crate::engine::variables::path_value;
use crate::engine::RecipeVariables;
use crate::error::Result;

/// Source of the directory the process was started from.
pub trait CurrentDirectoryProvider {
    /// The current directory.
    fn current_dir(&self) -> Result<PathBuf>;
}

/// Reads the process's current directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessCurrentDirectory;

impl CurrentDirectoryProvider for ProcessCurrentDirectory {
    fn current_dir(&self) -> Result<PathBuf> {
        Ok(std::env::current_dir()?)
    }
}

/// Always reports the same directory.
#[derive(Debug, Clone)]
pub struct FixedCurrentDirectory(pub PathBuf);

impl CurrentDirectoryProvider for FixedCurrentDirectory {
    fn current_dir(&self) -> Result<PathBuf> {
        Ok(self.0.clone())
    }
}

/// Builds the common variables: `recipe_name`, `recipe_dir` and
/// `current_dir`, on top of the engine's standard variables.
pub struct CommonRecipeVariableGenerator {
    recipe_dir: PathBuf,
    current_directory: Box<dyn CurrentDirectoryProvider>,
}

impl CommonRecipeVariableGenerator {
    /// Create a generator for recipes living in `recipe_dir`.
    pub fn new(
        recipe_dir: impl Into<PathBuf>,
        current_directory: Box<dyn CurrentDirectoryProvider>,
    ) -> Self {
        Self {
            recipe_dir: recipe_dir.into(),
            current_directory,
        }
    }

    /// Directory the recipes live in.
    pub fn recipe_dir(&self) -> &Path {
        &self.recipe_dir
    }

    /// Common variables for `recipe_name`, merged over `standard`.
    pub fn generate(
        &self,
        recipe_name: &str,
        standard: RecipeVariables,
    ) -> Result<RecipeVariables> {
        let mut common = RecipeVariables::new();
        common.insert("recipe_name", recipe_name);
        common.insert("recipe_dir", path_value(&self.recipe_dir));
        common.insert(
            "current_dir",
            path_value(&self.current_directory.current_dir()?),
        );
        Ok(standard.merged_with(common))
    }
}
