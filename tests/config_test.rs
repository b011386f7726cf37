//! Integration tests for Settings rules loading.
//!
//! These tests use explicit rules files in temp directories; a global config
//! on the machine running them would be merged underneath.

use std::fs;

use tempfile::TempDir;

use yaml_sort::config::{ListSortRule, Settings};
use yaml_sort::ApplicationError;

#[test]
fn given_rules_file_when_load_then_rules_flattened_into_map() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.yaml");
    fs::write(
        &path,
        r#"
listSortKeys:
  - path: spec.egress
    key: name
  - path: spec.ingress
    key: port
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert!(settings
        .list_sort_keys
        .contains(&ListSortRule::new("spec.egress", "name")));
    let map = settings.list_sort_keys_map();
    assert_eq!(map.get("spec.egress").map(String::as_str), Some("name"));
    assert_eq!(map.get("spec.ingress").map(String::as_str), Some("port"));
}

#[test]
fn given_missing_rules_file_when_load_then_no_rules_and_no_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does-not-exist.yaml");

    let settings = Settings::load(Some(&path)).expect("missing file is not an error");

    let without_rules = Settings::load(None).unwrap();
    assert_eq!(settings, without_rules);
}

#[test]
fn given_malformed_rules_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "listSortKeys: [unclosed\n").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }), "got {err:?}");
    assert!(err.to_string().contains("broken.yaml"));
}

#[test]
fn given_wrong_shape_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shape.yaml");
    fs::write(&path, "listSortKeys:\n  spec.egress: name\n").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }), "got {err:?}");
}

#[test]
fn given_rule_with_empty_key_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty-key.yaml");
    fs::write(&path, "listSortKeys:\n  - path: spec.egress\n    key: \"\"\n").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(err.to_string().contains("empty key"), "got {err}");
}

#[test]
fn given_empty_rules_file_when_load_then_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.yaml");
    fs::write(&path, "\n").unwrap();

    let settings = Settings::load(Some(&path)).expect("empty file is valid");

    assert!(settings.root_key_order.contains(&"apiVersion".to_string()));
}

#[test]
fn given_root_key_order_in_rules_file_when_load_then_used_for_sort_options() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("order.yaml");
    fs::write(&path, "rootKeyOrder: [name, version]\n").unwrap();

    let settings = Settings::load(Some(&path)).unwrap();
    let options = settings.sort_options(true);

    assert_eq!(options.root_key_order.keys(), ["name", "version"]);
    assert!(options.fixed_root_order);
}

#[test]
fn given_loaded_rules_when_sorting_then_rules_applied() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.yaml");
    fs::write(&path, "listSortKeys:\n  - path: items\n    key: id\n").unwrap();
    let settings = Settings::load(Some(&path)).unwrap();

    let output = yaml_sort::sort_document(
        b"items:\n- id: b\n- id: a\n",
        &settings.sort_options(false),
    )
    .unwrap();

    assert_eq!(
        String::from_utf8(output).unwrap(),
        "items:\n- id: a\n- id: b\n"
    );
}
