//! Recipe names derived from file names.

use std::path::Path;

use crate::error::{RecipeRunnerError, Result};

/// Extension every recipe file must carry.
pub const RECIPE_EXTENSION: &str = "yml";

/// Derives a recipe name from its file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeNameExtractor;

impl RecipeNameExtractor {
    /// Create an extractor.
    pub fn new() -> Self {
        Self
    }

    /// Strip the directory and the trailing `.yml`.
    ///
    /// Only the last extension is removed: `deploy.rr.yml` is `deploy.rr`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRecipeFilename` unless the last extension is exactly
    /// `yml`.
    pub fn extract_name_from_filename(&self, recipe_filename: &str) -> Result<String> {
        let path = Path::new(recipe_filename);
        let invalid = || RecipeRunnerError::InvalidRecipeFilename {
            filename: recipe_filename.to_string(),
        };

        if path.extension().and_then(|e| e.to_str()) != Some(RECIPE_EXTENSION) {
            return Err(invalid());
        }

        path.file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .map(str::to_string)
            .ok_or_else(invalid)
    }
}
