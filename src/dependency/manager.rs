//! Per-recipe dependency environments.
//!
//! A recipe that declares packages gets its own environment directory. The
//! [`DependencyManager`] decides whether the environment's manifest is
//! stale, rewrites it, runs the package manager there and reads back the
//! modules the installed packages declare.
//!
//! Staleness compares the requested packages against the manifest file
//! written on the previous update, not against the lock file. An
//! environment whose lock file is missing always needs an update.

use std::path::PathBuf;

use crate::error::{RecipeRunnerError, Result};
use crate::process::Process;
use crate::ui::RecipeIO;
use crate::workspace::WorkingDirectory;

use super::lock::EnvironmentLock;
use super::lockfile::LockFile;
use super::manifest::{DependencyManifest, ManifestFile};

/// Directory, relative to an environment, holding installed executables.
pub const VENDOR_BIN_DIR: &str = "vendor/bin";

/// How the external package manager is found and invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManagerSettings {
    /// Executable names tried in order.
    pub candidates: Vec<String>,

    /// Manifest file name inside an environment.
    pub manifest_file: String,

    /// Lock file name inside an environment.
    pub lock_file: String,

    /// Arguments for a non-interactive, production-only update.
    pub update_args: Vec<String>,
}

impl Default for PackageManagerSettings {
    fn default() -> Self {
        Self {
            candidates: vec!["composer".to_string(), "composer.phar".to_string()],
            manifest_file: "composer.json".to_string(),
            lock_file: "composer.lock".to_string(),
            update_args: vec![
                "update".to_string(),
                "--no-interaction".to_string(),
                "--no-dev".to_string(),
                "--prefer-dist".to_string(),
            ],
        }
    }
}

/// What a recipe run needs from an activated environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivatedEnvironment {
    /// Environment directory, when one is in use.
    pub root: Option<PathBuf>,

    /// Directories searched first when actions run commands.
    pub bin_dirs: Vec<PathBuf>,
}

/// Operations the run orchestration needs from a dependency environment.
pub trait DependencyEnvironment {
    /// Take the exclusive lock on the recipe's environment.
    fn lock(&self, recipe_name: &str, io: &mut dyn RecipeIO) -> Result<EnvironmentLock>;

    /// Check whether `manifest` differs from the one last installed.
    fn is_necessary_update(&self, recipe_name: &str, manifest: &DependencyManifest)
        -> Result<bool>;

    /// Write the environment's manifest file, replacing any previous one.
    fn generate_manifest_file(&self, recipe_name: &str, manifest: &DependencyManifest)
        -> Result<()>;

    /// Run the package manager inside the environment.
    fn update(&mut self, recipe_name: &str, io: &mut dyn RecipeIO) -> Result<()>;

    /// Module identifiers declared by the installed packages.
    fn module_class_names_installed(&self, recipe_name: &str) -> Result<Vec<String>>;

    /// Make the installed packages reachable by the run.
    fn activate(&self, recipe_name: &str) -> Result<ActivatedEnvironment>;
}

/// Manages recipe environments through a package manager process.
pub struct DependencyManager<P: Process> {
    process: P,
    working_directory: WorkingDirectory,
    settings: PackageManagerSettings,
    package_manager_path: Option<PathBuf>,
}

impl<P: Process> DependencyManager<P> {
    /// Create a manager with default package manager settings.
    pub fn new(process: P, working_directory: WorkingDirectory) -> Self {
        Self::with_settings(process, working_directory, PackageManagerSettings::default())
    }

    /// Create a manager with explicit settings.
    pub fn with_settings(
        process: P,
        working_directory: WorkingDirectory,
        settings: PackageManagerSettings,
    ) -> Self {
        Self {
            process,
            working_directory,
            settings,
            package_manager_path: None,
        }
    }

    /// Resolve the package manager executable once; later calls reuse it.
    fn package_manager_path(&mut self) -> Result<PathBuf> {
        if let Some(path) = &self.package_manager_path {
            return Ok(path.clone());
        }

        let path = self
            .settings
            .candidates
            .iter()
            .find_map(|name| self.process.find_executable(name))
            .ok_or_else(|| RecipeRunnerError::PackageManagerNotFound {
                candidates: self.settings.candidates.join(", "),
            })?;

        tracing::debug!("Using package manager at {}", path.display());
        self.package_manager_path = Some(path.clone());
        Ok(path)
    }

    fn read_lock_file(&self, recipe_name: &str) -> Result<LockFile> {
        let lock_file = &self.settings.lock_file;
        let content = self
            .working_directory
            .read_recipe_internal_file(recipe_name, lock_file)?;
        let path = self
            .working_directory
            .recipe_internal_file(recipe_name, lock_file)?;
        LockFile::parse(&path, &content)
    }

    fn read_manifest_file(&self, recipe_name: &str) -> Result<ManifestFile> {
        let manifest_file = &self.settings.manifest_file;
        let content = self
            .working_directory
            .read_recipe_internal_file(recipe_name, manifest_file)?;
        let path = self
            .working_directory
            .recipe_internal_file(recipe_name, manifest_file)?;
        ManifestFile::parse(&path, &content)
    }
}

impl<P: Process> DependencyEnvironment for DependencyManager<P> {
    fn lock(&self, recipe_name: &str, io: &mut dyn RecipeIO) -> Result<EnvironmentLock> {
        // Validates the name before the directory is created.
        self.working_directory
            .recipe_internal_file(recipe_name, super::lock::ENVIRONMENT_LOCK_FILE)?;
        let dir = self.working_directory.recipe_internal_directory(recipe_name);
        EnvironmentLock::acquire(&dir, io)
    }

    fn is_necessary_update(
        &self,
        recipe_name: &str,
        manifest: &DependencyManifest,
    ) -> Result<bool> {
        if !self
            .working_directory
            .exists_recipe_internal_file(recipe_name, &self.settings.lock_file)?
        {
            tracing::debug!("No lock file for recipe '{}'", recipe_name);
            return Ok(true);
        }

        let recorded = self.read_manifest_file(recipe_name)?;
        let stale = !manifest.matches(&recorded.require);

        tracing::debug!(
            "Environment of recipe '{}' is {}",
            recipe_name,
            if stale { "stale" } else { "up to date" }
        );

        Ok(stale)
    }

    fn generate_manifest_file(
        &self,
        recipe_name: &str,
        manifest: &DependencyManifest,
    ) -> Result<()> {
        let content = ManifestFile::for_manifest(manifest).to_json()?;
        self.working_directory.write_recipe_internal_file(
            recipe_name,
            &self.settings.manifest_file,
            &content,
        )
    }

    fn update(&mut self, recipe_name: &str, io: &mut dyn RecipeIO) -> Result<()> {
        let program = self.package_manager_path()?;
        let dir = self.working_directory.recipe_internal_directory(recipe_name);
        self.process
            .run(&program, &self.settings.update_args, &dir, io)
    }

    fn module_class_names_installed(&self, recipe_name: &str) -> Result<Vec<String>> {
        Ok(self.read_lock_file(recipe_name)?.module_ids())
    }

    fn activate(&self, recipe_name: &str) -> Result<ActivatedEnvironment> {
        let root = self.working_directory.recipe_internal_directory(recipe_name);
        let mut bin_dirs = Vec::new();

        if self
            .working_directory
            .exists_recipe_internal_file(recipe_name, VENDOR_BIN_DIR)?
        {
            bin_dirs.push(root.join(VENDOR_BIN_DIR));
        }

        tracing::debug!(
            "Activated environment {} ({} bin dirs)",
            root.display(),
            bin_dirs.len()
        );

        Ok(ActivatedEnvironment {
            root: Some(root),
            bin_dirs,
        })
    }
}
