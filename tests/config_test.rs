// tests/config_test.rs
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use grelly::config::{load_config, BasePolicy, Config, CONFIG_FILE_NAME};
use grelly::GrellyError;
use serial_test::serial;
use tempfile::{NamedTempFile, TempDir};

#[test]
#[serial]
fn test_load_from_explicit_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[patterns]
branch = "maint-<major>.<minor>"
tag = "<major>.<minor>.<patch>"

[resolution]
base_policy = "nearest"
add_marker_patch = true

[release]
changelog = "docs/CHANGES.md"
commit = true
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let dir = TempDir::new().unwrap();
    let config = load_config(Some(temp_file.path()), dir.path()).unwrap();
    assert_eq!(config.patterns.branch, "maint-<major>.<minor>");
    assert_eq!(config.patterns.tag, "<major>.<minor>.<patch>");
    assert_eq!(
        config.patterns.release_commit,
        "release: <major>.<minor>.<patch>"
    );
    assert_eq!(config.resolution.base_policy, BasePolicy::Nearest);
    assert!(config.resolution.add_marker_patch);
    assert!(!config.resolution.branch_suffix);
    assert_eq!(config.release.changelog, PathBuf::from("docs/CHANGES.md"));
    assert!(config.release.commit);
}

#[test]
#[serial]
fn test_missing_explicit_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let err = load_config(Some(&dir.path().join("nope.toml")), dir.path()).unwrap_err();
    assert!(matches!(err, GrellyError::Config(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
#[serial]
fn test_invalid_toml_is_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "[patterns\ntag = 1").unwrap();

    let err = load_config(None, dir.path()).unwrap_err();
    assert!(matches!(err, GrellyError::Config(_)));
}

#[test]
#[serial]
fn test_repository_file_is_discovered() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[resolution]\nbranch_suffix = true\n",
    )
    .unwrap();

    let config = load_config(None, dir.path()).unwrap();
    assert!(config.resolution.branch_suffix);
    assert_eq!(config.patterns, Config::default().patterns);
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_user_config_dir_fallback() {
    let home = TempDir::new().unwrap();
    let user_dir = home.path().join("grelly");
    fs::create_dir_all(&user_dir).unwrap();
    fs::write(
        user_dir.join(CONFIG_FILE_NAME),
        "[resolution]\nbase_policy = \"root\"\n",
    )
    .unwrap();

    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", home.path());

    let repo_dir = TempDir::new().unwrap();
    let from_user = load_config(None, repo_dir.path());

    fs::write(repo_dir.path().join(CONFIG_FILE_NAME), "").unwrap();
    let from_repo = load_config(None, repo_dir.path());

    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(from_user.unwrap().resolution.base_policy, BasePolicy::Root);
    // the repository file wins even when empty
    assert_eq!(
        from_repo.unwrap().resolution.base_policy,
        BasePolicy::NearestAtOrBelow
    );
}
