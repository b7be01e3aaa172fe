//! Tests for settings module - layered YAML loading.

use std::fs;

use omni_scriptgen::{load_settings_from_paths, IndentStyle, TypeNamePolicy, WriterSettings};
use tempfile::TempDir;

#[test]
fn test_user_overrides_system() {
    let dir = TempDir::new().expect("Should create temp dir");
    let system = dir.path().join("system.yaml");
    let user = dir.path().join("user.yaml");
    fs::write(
        &system,
        "writer:\n  indent_size: 2\n  max_line_length: 80\n",
    )
    .expect("write system");
    fs::write(&user, "writer:\n  max_line_length: 100\n  type_name_policy: drop_namespace\n")
        .expect("write user");

    let settings = load_settings_from_paths(&system, &user);
    assert_eq!(settings.indent_size, 2);
    assert_eq!(settings.max_line_length, 100);
    assert_eq!(settings.type_name_policy, TypeNamePolicy::DropNamespace);
    assert_eq!(settings.indent_style, IndentStyle::Spaces);
}

#[test]
fn test_missing_files_give_defaults() {
    let dir = TempDir::new().expect("Should create temp dir");
    let settings = load_settings_from_paths(
        &dir.path().join("absent-system.yaml"),
        &dir.path().join("absent-user.yaml"),
    );
    assert_eq!(settings, WriterSettings::default());
}

#[test]
fn test_invalid_file_is_ignored() {
    let dir = TempDir::new().expect("Should create temp dir");
    let system = dir.path().join("system.yaml");
    let user = dir.path().join("user.yaml");
    fs::write(&system, "writer:\n  indent_style: tabs\n").expect("write system");
    fs::write(&user, "writer: [not, a, map").expect("write user");

    let settings = load_settings_from_paths(&system, &user);
    assert_eq!(settings.indent_style, IndentStyle::Tabs);
}

#[test]
fn test_from_yaml_file() {
    let dir = TempDir::new().expect("Should create temp dir");
    let path = dir.path().join("settings.yaml");
    fs::write(&path, "writer:\n  use_type_accelerators: false\n").expect("write");
    let settings = WriterSettings::from_yaml_file(&path).expect("Should load");
    assert!(!settings.use_type_accelerators);
    assert!(WriterSettings::from_yaml_file(&dir.path().join("missing.yaml")).is_err());
}
