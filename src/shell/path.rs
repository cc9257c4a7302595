//! Search-path handling for package managers and vendor binaries.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Extensions tried after the bare name on Windows, where composer ships
/// as `composer.bat`.
#[cfg(windows)]
const EXECUTABLE_EXTENSIONS: &[&str] = &["exe", "bat", "cmd"];

#[cfg(not(windows))]
const EXECUTABLE_EXTENSIONS: &[&str] = &[];

/// Whether `path` is a regular file the current user may run.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match path.metadata() {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

/// Whether `path` is a regular file. Windows has no execute bit.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Find `name` in `dirs`, earliest directory first.
pub fn find_executable(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| candidate_files(dir, name))
        .find(|candidate| is_executable(candidate))
}

fn candidate_files(dir: &Path, name: &str) -> impl Iterator<Item = PathBuf> {
    let suffixed: Vec<PathBuf> = EXECUTABLE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", name, ext)))
        .collect();
    std::iter::once(dir.join(name)).chain(suffixed)
}

/// Directories listed in the inherited `PATH`.
pub fn system_search_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Build a `PATH` value with `dirs` searched before `current`.
pub fn prepend_to_path(dirs: &[PathBuf], current: &OsStr) -> Result<OsString> {
    let entries = dirs
        .iter()
        .cloned()
        .chain(std::env::split_paths(current));
    std::env::join_paths(entries).map_err(|e| anyhow::anyhow!("invalid PATH entry: {}", e).into())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn install(dir: &Path, name: &str, mode: u32) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn earlier_directory_wins() {
        let temp = TempDir::new().unwrap();
        let vendor = install(&temp.path().join("vendor/bin"), "composer", 0o755);
        install(&temp.path().join("usr/bin"), "composer", 0o755);

        let dirs = [temp.path().join("vendor/bin"), temp.path().join("usr/bin")];
        assert_eq!(find_executable("composer", &dirs), Some(vendor));
    }

    #[test]
    fn missing_name_is_none() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            find_executable("composer", &[temp.path().to_path_buf()]),
            None
        );
    }

    #[test]
    fn files_without_execute_bit_are_skipped() {
        let temp = TempDir::new().unwrap();
        install(&temp.path().join("a"), "composer", 0o644);
        let runnable = install(&temp.path().join("b"), "composer", 0o700);

        let dirs = [temp.path().join("a"), temp.path().join("b")];
        assert_eq!(find_executable("composer", &dirs), Some(runnable));
    }

    #[test]
    fn directories_are_not_executables() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("composer")).unwrap();

        assert!(!is_executable(&temp.path().join("composer")));
        assert_eq!(
            find_executable("composer", &[temp.path().to_path_buf()]),
            None
        );
    }

    #[test]
    fn prepend_puts_new_dirs_first() {
        let current = std::env::join_paths([PathBuf::from("/usr/bin")]).unwrap();
        let joined = prepend_to_path(&[PathBuf::from("/env/vendor/bin")], &current).unwrap();
        let entries: Vec<PathBuf> = std::env::split_paths(&joined).collect();
        assert_eq!(
            entries,
            vec![PathBuf::from("/env/vendor/bin"), PathBuf::from("/usr/bin")]
        );
    }
}
