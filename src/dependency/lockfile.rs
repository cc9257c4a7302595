//! Read-only view of the package manager's lock file.
//!
//! Only the parts the runner cares about are modelled: the package list
//! and, per package, the module identifiers declared under
//! `extra.recipe-runner.modules`.

use serde::Deserialize;
use std::path::Path;

use crate::error::{RecipeRunnerError, Result};

/// The lock file written by the package manager.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LockFile {
    /// Installed packages.
    #[serde(default)]
    pub packages: Vec<LockedPackage>,
}

/// One installed package.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LockedPackage {
    /// Package name.
    #[serde(default)]
    pub name: String,

    /// Package metadata.
    #[serde(default)]
    pub extra: Option<PackageExtra>,
}

/// The `extra` block of an installed package.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageExtra {
    /// Recipe runner metadata, when the package ships modules.
    #[serde(rename = "recipe-runner", default)]
    pub recipe_runner: Option<RecipeRunnerExtra>,
}

/// Recipe runner metadata of a package.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeRunnerExtra {
    /// Module identifiers.
    #[serde(default)]
    pub modules: Vec<String>,
}

impl LockedPackage {
    /// Module identifiers declared by this package.
    pub fn modules(&self) -> &[String] {
        self.extra
            .as_ref()
            .and_then(|extra| extra.recipe_runner.as_ref())
            .map(|rr| rr.modules.as_slice())
            .unwrap_or_default()
    }
}

impl LockFile {
    /// Parse lock file content read from `path`.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| RecipeRunnerError::MalformedJson {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Module identifiers across all packages, deduplicated in first-seen order.
    pub fn module_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for module in self.packages.iter().flat_map(LockedPackage::modules) {
            if !ids.contains(module) {
                ids.push(module.clone());
            }
        }
        ids
    }
}
