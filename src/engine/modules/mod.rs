//! Built-in modules.

pub mod essential;
pub mod filesystem;

pub use essential::EssentialModule;
pub use filesystem::FilesystemModule;
