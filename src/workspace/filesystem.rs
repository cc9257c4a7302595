//! Filesystem port and its OS-backed adapter.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{RecipeRunnerError, Result};

/// Raw file access used by [`WorkingDirectory`](super::WorkingDirectory).
pub trait Filesystem: Send + Sync {
    /// Write `content` to `path`, creating intermediate directories.
    fn dump_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Read a whole file as UTF-8.
    fn read_file(&self, path: &Path) -> Result<String>;

    /// Check whether `path` exists.
    fn exists(&self, path: &Path) -> bool;
}

/// [`Filesystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn dump_file(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(RecipeRunnerError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RecipeRunnerError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => RecipeRunnerError::FileUnreadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
