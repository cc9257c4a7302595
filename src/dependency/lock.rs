//! Exclusive lock on a recipe environment.
//!
//! Two runs of the same recipe would otherwise race on the manifest and
//! lock files. The guard holds an advisory lock on `<env>/.lock` for the
//! whole run; a second run waits until it is released.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{RecipeRunnerError, Result};
use crate::ui::{RecipeIO, Verbosity};

/// Name of the lock file inside a recipe environment.
pub const ENVIRONMENT_LOCK_FILE: &str = ".lock";

/// RAII guard for a recipe environment lock; released on drop.
#[derive(Debug)]
pub struct EnvironmentLock {
    file: Option<File>,
    path: Option<PathBuf>,
}

impl EnvironmentLock {
    /// Lock the environment at `dir`, waiting for any other holder.
    pub fn acquire(dir: &Path, io: &mut dyn RecipeIO) -> Result<Self> {
        let (file, path) = open_lock_file(dir)?;

        if FileExt::try_lock_exclusive(&file).is_err() {
            io.write(
                &format!(
                    "Waiting for another run to release {}...",
                    path.display()
                ),
                true,
                Verbosity::Verbose,
            );
            FileExt::lock_exclusive(&file).map_err(|e| RecipeRunnerError::EnvironmentLock {
                path: path.clone(),
                message: e.to_string(),
            })?;
        }

        tracing::debug!("Locked recipe environment {}", path.display());

        Ok(Self {
            file: Some(file),
            path: Some(path),
        })
    }

    /// Lock the environment at `dir` only if nobody else holds it.
    pub fn try_acquire(dir: &Path) -> Result<Option<Self>> {
        let (file, path) = open_lock_file(dir)?;

        if FileExt::try_lock_exclusive(&file).is_err() {
            return Ok(None);
        }

        Ok(Some(Self {
            file: Some(file),
            path: Some(path),
        }))
    }

    /// A guard that holds no lock.
    pub fn detached() -> Self {
        Self {
            file: None,
            path: None,
        }
    }

    /// Check whether this guard holds a lock.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// Path of the locked file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Drop for EnvironmentLock {
    fn drop(&mut self) {
        if let Some(file) = &self.file {
            let _ = FileExt::unlock(file);
        }
    }
}

fn open_lock_file(dir: &Path) -> Result<(File, PathBuf)> {
    let path = dir.join(ENVIRONMENT_LOCK_FILE);
    let lock_error = |e: std::io::Error| RecipeRunnerError::EnvironmentLock {
        path: path.clone(),
        message: e.to_string(),
    };

    fs::create_dir_all(dir).map_err(lock_error)?;
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&path)
        .map_err(lock_error)?;

    Ok((file, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockIO;
    use tempfile::TempDir;

    #[test]
    fn acquire_creates_lock_file() {
        let temp = TempDir::new().unwrap();
        let env = temp.path().join(".rr/demo");
        let mut io = MockIO::new();

        let lock = EnvironmentLock::acquire(&env, &mut io).unwrap();

        assert!(lock.is_held());
        assert_eq!(lock.path(), Some(env.join(ENVIRONMENT_LOCK_FILE).as_path()));
        assert!(env.join(ENVIRONMENT_LOCK_FILE).exists());
        assert!(io.written().is_empty());
    }

    #[test]
    fn second_holder_is_refused_until_release() {
        let temp = TempDir::new().unwrap();
        let mut io = MockIO::new();

        let first = EnvironmentLock::acquire(temp.path(), &mut io).unwrap();
        assert!(EnvironmentLock::try_acquire(temp.path()).unwrap().is_none());

        drop(first);
        assert!(EnvironmentLock::try_acquire(temp.path()).unwrap().is_some());
    }

    #[test]
    fn lock_file_survives_release() {
        let temp = TempDir::new().unwrap();
        let lock = EnvironmentLock::try_acquire(temp.path()).unwrap();
        drop(lock);
        assert!(temp.path().join(ENVIRONMENT_LOCK_FILE).exists());
    }

    #[test]
    fn detached_guard_holds_nothing() {
        let lock = EnvironmentLock::detached();
        assert!(!lock.is_held());
        assert!(lock.path().is_none());
    }
}
