use super::*;

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_config(name: &str, content: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_nanos();
    let path = std::env::temp_dir().join(format!("org-console-{name}-{unique}.toml"));
    fs::write(&path, content).expect("write temp config");
    path
}

#[test]
fn defaults_are_sensible() {
    let config = ConsoleConfig::default();
    assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    assert!(config.indent_rows);
    assert_eq!(config.numbering, RowNumbering::Sequential);
}

#[test]
fn config_file_values_are_applied() {
    let path = temp_config(
        "full",
        r#"
ORG_CONSOLE_PAGE_SIZE = 50
ORG_CONSOLE_INDENT_ROWS = "false"
ORG_CONSOLE_ROW_NUMBERING = "page_local"
"#,
    );

    let config = ConsoleConfig::from_config_file(&path).expect("config parses");
    fs::remove_file(&path).ok();

    assert_eq!(config.page_size, 50);
    assert!(!config.indent_rows);
    assert_eq!(config.numbering, RowNumbering::PageLocal);
}

#[test]
fn missing_keys_fall_back_to_defaults() {
    let path = temp_config("partial", "ORG_CONSOLE_PAGE_SIZE = 100\n");

    let config = ConsoleConfig::from_config_file(&path).expect("config parses");
    fs::remove_file(&path).ok();

    assert_eq!(config.page_size, 100);
    assert!(config.indent_rows);
    assert_eq!(config.numbering, RowNumbering::Sequential);
}

#[test]
fn invalid_page_size_is_a_typed_error() {
    let path = temp_config("bad-size", "ORG_CONSOLE_PAGE_SIZE = \"plenty\"\n");

    let err = ConsoleConfig::from_config_file(&path).unwrap_err();
    fs::remove_file(&path).ok();
    assert!(matches!(err, ConfigError::InvalidPageSize { value } if value == "plenty"));
}

#[test]
fn invalid_numbering_is_a_typed_error() {
    let path = temp_config("bad-numbering", "ORG_CONSOLE_ROW_NUMBERING = \"diagonal\"\n");

    let err = ConsoleConfig::from_config_file(&path).unwrap_err();
    fs::remove_file(&path).ok();
    assert!(matches!(err, ConfigError::InvalidRowNumbering { value } if value == "diagonal"));
}

#[test]
fn invalid_flag_is_a_typed_error() {
    let path = temp_config("bad-flag", "ORG_CONSOLE_INDENT_ROWS = \"maybe\"\n");

    let err = ConsoleConfig::from_config_file(&path).unwrap_err();
    fs::remove_file(&path).ok();
    assert!(matches!(
        err,
        ConfigError::InvalidFlag { key: ENV_INDENT_ROWS, value } if value == "maybe"
    ));
}

#[test]
fn unreadable_file_is_a_typed_error() {
    let path = std::env::temp_dir().join("org-console-nonexistent.toml");
    let err = ConsoleConfig::from_config_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadConfigFile { .. }));
}

#[test]
fn malformed_toml_is_a_typed_error() {
    let path = temp_config("malformed", "ORG_CONSOLE_PAGE_SIZE = = 5\n");

    let err = ConsoleConfig::from_config_file(&path).unwrap_err();
    fs::remove_file(&path).ok();
    assert!(matches!(err, ConfigError::ParseConfigFile { .. }));
}

#[test]
fn sanitized_floors_page_size() {
    let config = ConsoleConfig {
        page_size: 0,
        ..ConsoleConfig::default()
    };
    assert_eq!(config.sanitized().page_size, 1);
}

#[test]
fn zero_page_size_from_file_is_floored() {
    let path = temp_config("zero-size", "ORG_CONSOLE_PAGE_SIZE = 0\n");

    let config = ConsoleConfig::from_config_file(&path).expect("config parses");
    fs::remove_file(&path).ok();
    assert_eq!(config.page_size, 1);
}
