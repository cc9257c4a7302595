//! Path composition for a recipe's working directory.
//!
//! Every recipe gets a private subtree at `<root>/.rr/<recipe name>/` that
//! holds its dependency manifest, the package manager's lock file and the
//! installed packages. Nothing here creates directories; the
//! [`Filesystem`] port does that when a file is written.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{RecipeRunnerError, Result};

use super::filesystem::Filesystem;

/// Name of the directory holding every recipe environment.
pub const RECIPE_INTERNAL_DIR: &str = ".rr";

/// A recipe working directory.
#[derive(Clone)]
pub struct WorkingDirectory {
    root: PathBuf,
    fs: Arc<dyn Filesystem>,
}

impl std::fmt::Debug for WorkingDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkingDirectory")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl WorkingDirectory {
    /// Create a working directory rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, fs: Arc<dyn Filesystem>) -> Result<Self> {
        let root = root.into();
        assert_not_empty(&root.to_string_lossy(), "workingDir")?;
        Ok(Self { root, fs })
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read a file relative to the root.
    pub fn read_file(&self, filename: &str) -> Result<String> {
        assert_not_empty(filename, "filename")?;
        self.fs.read_file(&self.root.join(filename))
    }

    /// Write a file inside the recipe's environment directory.
    pub fn write_recipe_internal_file(
        &self,
        recipe_name: &str,
        filename: &str,
        content: &str,
    ) -> Result<()> {
        let path = self.recipe_internal_file(recipe_name, filename)?;
        self.fs.dump_file(&path, content)
    }

    /// Read a file inside the recipe's environment directory.
    pub fn read_recipe_internal_file(&self, recipe_name: &str, filename: &str) -> Result<String> {
        let path = self.recipe_internal_file(recipe_name, filename)?;
        self.fs.read_file(&path)
    }

    /// Check whether a file exists inside the recipe's environment directory.
    pub fn exists_recipe_internal_file(&self, recipe_name: &str, filename: &str) -> Result<bool> {
        let path = self.recipe_internal_file(recipe_name, filename)?;
        Ok(self.fs.exists(&path))
    }

    /// The recipe's environment directory, without touching the filesystem.
    pub fn recipe_internal_directory(&self, recipe_name: &str) -> PathBuf {
        self.root.join(RECIPE_INTERNAL_DIR).join(recipe_name)
    }

    /// Absolute path of a file inside the recipe's environment directory.
    pub fn recipe_internal_file(&self, recipe_name: &str, filename: &str) -> Result<PathBuf> {
        assert_not_empty(recipe_name, "recipeName")?;
        assert_not_empty(filename, "filename")?;
        Ok(self.recipe_internal_directory(recipe_name).join(filename))
    }
}

fn assert_not_empty(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RecipeRunnerError::EmptyArgument {
            field: field.to_string(),
        });
    }
    Ok(())
}
