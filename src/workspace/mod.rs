//! Recipe working directory and raw file access.

pub mod directory;
pub mod filesystem;

pub use directory::{WorkingDirectory, RECIPE_INTERNAL_DIR};
pub use filesystem::{Filesystem, OsFilesystem};
