//! Recipe dependency environments.
//!
//! Recipes may declare packages under `extra.rr.packages`. Each recipe gets
//! its own environment below the working directory where those packages are
//! installed by an external package manager.

pub mod lock;
pub mod lockfile;
pub mod manager;
pub mod manifest;

pub use lock::{EnvironmentLock, ENVIRONMENT_LOCK_FILE};
pub use lockfile::{LockFile, LockedPackage};
pub use manager::{
    ActivatedEnvironment, DependencyEnvironment, DependencyManager, PackageManagerSettings,
    VENDOR_BIN_DIR,
};
pub use manifest::{DependencyManifest, ManifestFile, MINIMUM_STABILITY};
