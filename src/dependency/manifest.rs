//! Dependency manifests: requested packages and the file they are written to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{RecipeRunnerError, Result};

/// Stability flag written into every generated manifest file.
pub const MINIMUM_STABILITY: &str = "dev";

/// Package name to version constraint, as declared by a recipe.
///
/// Keys are unique, never empty and iterate in sorted order, so two
/// manifests with the same pairs compare equal whatever order they were
/// declared in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DependencyManifest(BTreeMap<String, String>);

impl DependencyManifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a manifest from `(name, constraint)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut manifest = Self::new();
        for (name, constraint) in pairs {
            manifest.insert(name, constraint)?;
        }
        Ok(manifest)
    }

    /// Build a manifest from the `rr.packages` value of a recipe.
    ///
    /// The value must be a map whose values are strings.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| RecipeRunnerError::InvalidPackages {
                message: "must be a map of package name to version constraint.".to_string(),
            })?;

        let mut manifest = Self::new();
        for (name, constraint) in map {
            let constraint =
                constraint
                    .as_str()
                    .ok_or_else(|| RecipeRunnerError::InvalidPackages {
                        message: format!("has a non-string constraint for package \"{}\".", name),
                    })?;
            manifest.insert(name.as_str(), constraint)?;
        }
        Ok(manifest)
    }

    /// Add or replace a package constraint.
    pub fn insert(&mut self, name: impl Into<String>, constraint: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RecipeRunnerError::InvalidPackages {
                message: "contains an empty package name.".to_string(),
            });
        }
        self.0.insert(name, constraint.into());
        Ok(())
    }

    /// Constraint for a package.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of packages.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no packages are declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate pairs in package-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check whether `recorded` asks for exactly the same packages.
    ///
    /// Constraints are compared as plain strings; no version range reasoning.
    pub fn matches(&self, recorded: &BTreeMap<String, String>) -> bool {
        if self.0.len() != recorded.len() {
            return false;
        }

        recorded
            .iter()
            .all(|(name, constraint)| self.0.get(name) == Some(constraint))
    }
}

/// The manifest file handed to the package manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    /// Required packages.
    #[serde(default)]
    pub require: BTreeMap<String, String>,

    /// Lowest package stability the package manager may install.
    #[serde(rename = "minimum-stability", default)]
    pub minimum_stability: String,
}

impl ManifestFile {
    /// Manifest file content for a requested manifest.
    pub fn for_manifest(manifest: &DependencyManifest) -> Self {
        Self {
            require: manifest.0.clone(),
            minimum_stability: MINIMUM_STABILITY.to_string(),
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| anyhow::Error::from(e).into())
    }

    /// Parse manifest file content read from `path`.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| RecipeRunnerError::MalformedJson {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
