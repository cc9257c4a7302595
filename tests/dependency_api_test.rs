//! Dependency environment tests through the public API.

use recipe_runner::dependency::{
    DependencyEnvironment, DependencyManager, DependencyManifest, PackageManagerSettings,
};
use recipe_runner::process::SystemProcess;
use recipe_runner::workspace::{OsFilesystem, WorkingDirectory};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn manager(temp: &TempDir) -> DependencyManager<SystemProcess> {
    let dir = WorkingDirectory::new(temp.path(), Arc::new(OsFilesystem)).unwrap();
    DependencyManager::with_settings(
        SystemProcess::with_search_path(vec![temp.path().join("bin")]),
        dir,
        PackageManagerSettings::default(),
    )
}

fn manifest(pairs: &[(&str, &str)]) -> DependencyManifest {
    DependencyManifest::from_pairs(pairs.iter().copied()).unwrap()
}

#[test]
fn fresh_environment_needs_update() {
    let temp = TempDir::new().unwrap();
    let manager = manager(&temp);

    assert!(manager
        .is_necessary_update("site", &manifest(&[("acme/tools", "^1.0")]))
        .unwrap());
}

#[test]
fn matching_manifest_and_lock_is_current() {
    let temp = TempDir::new().unwrap();
    let manager = manager(&temp);
    let requested = manifest(&[("acme/tools", "^1.0"), ("acme/more", "~2.1")]);

    manager.generate_manifest_file("site", &requested).unwrap();
    fs::write(temp.path().join(".rr/site/composer.lock"), "{\"packages\": []}").unwrap();

    let reordered = manifest(&[("acme/more", "~2.1"), ("acme/tools", "^1.0")]);
    assert!(!manager.is_necessary_update("site", &reordered).unwrap());
    assert!(manager
        .is_necessary_update("site", &manifest(&[("acme/tools", "^1.0")]))
        .unwrap());
    assert!(manager.module_class_names_installed("site").unwrap().is_empty());
}

#[test]
fn environments_are_private_per_recipe() {
    let temp = TempDir::new().unwrap();
    let manager = manager(&temp);

    manager
        .generate_manifest_file("one", &manifest(&[("a/a", "1")]))
        .unwrap();
    manager
        .generate_manifest_file("two", &manifest(&[("b/b", "2")]))
        .unwrap();

    let one = fs::read_to_string(temp.path().join(".rr/one/composer.json")).unwrap();
    let two = fs::read_to_string(temp.path().join(".rr/two/composer.json")).unwrap();
    assert!(one.contains("a/a") && !one.contains("b/b"));
    assert!(two.contains("b/b") && !two.contains("a/a"));
}

#[cfg(unix)]
#[test]
fn update_runs_package_manager_in_environment() {
    use recipe_runner::ui::{MockIO, Verbosity};
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let bin = temp.path().join("bin");
    fs::create_dir_all(&bin).unwrap();
    fs::write(
        bin.join("composer.phar"),
        concat!(
            "#!/bin/sh\n",
            "echo \"resolving in $(basename \"$PWD\")\"\n",
            "echo '{\"packages\":[{\"extra\":{\"recipe-runner\":{\"modules\":[\"X\",\"Y\"]}}}]}'",
            " > composer.lock\n",
        ),
    )
    .unwrap();
    fs::set_permissions(bin.join("composer.phar"), fs::Permissions::from_mode(0o755)).unwrap();

    let mut manager = manager(&temp);
    manager
        .generate_manifest_file("site", &manifest(&[("x/y", "1")]))
        .unwrap();
    let mut io = MockIO::new();

    manager.update("site", &mut io).unwrap();

    assert_eq!(
        io.written()[0].message,
        "resolving in site".to_string()
    );
    assert_eq!(io.written()[0].verbosity, Verbosity::Verbose);
    assert_eq!(
        manager.module_class_names_installed("site").unwrap(),
        vec!["X", "Y"]
    );
}

#[test]
fn environment_lock_excludes_second_holder() {
    use recipe_runner::dependency::EnvironmentLock;
    use recipe_runner::ui::MockIO;

    let temp = TempDir::new().unwrap();
    let manager = manager(&temp);
    let mut io = MockIO::new();

    let held = manager.lock("site", &mut io).unwrap();
    assert!(EnvironmentLock::try_acquire(&temp.path().join(".rr/site"))
        .unwrap()
        .is_none());
    drop(held);
    assert!(EnvironmentLock::try_acquire(&temp.path().join(".rr/site"))
        .unwrap()
        .is_some());
}
