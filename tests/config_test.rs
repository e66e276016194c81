//! Integration tests for Settings layered loading.
//!
//! Each test uses its own environment prefix so parallel tests never see
//! each other's variables. The global config file is never consulted.

use std::fs;

use tempfile::TempDir;

use sigcli::config::Settings;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("sigcli.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_config_file_when_loading_then_file_values_override_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
width = 100
hide_help = true
help_names = ["aide"]
"#,
    );

    let settings = Settings::load_from(Some(&path), "SIGCLI_TEST_FILE").expect("load");

    assert_eq!(settings.width, 100);
    assert!(settings.hide_help);
    assert_eq!(settings.help_names, vec!["aide".to_string()]);
    assert!(settings.color, "unset keys keep their defaults");
}

#[test]
fn given_env_var_when_loading_then_env_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "width = 100\n");
    std::env::set_var("SIGCLI_TEST_ENV_WIDTH", "90");

    let settings = Settings::load_from(Some(&path), "SIGCLI_TEST_ENV").expect("load");

    std::env::remove_var("SIGCLI_TEST_ENV_WIDTH");
    assert_eq!(settings.width, 90);
}

#[test]
fn given_comma_list_in_env_when_loading_then_help_names_split() {
    std::env::set_var("SIGCLI_TEST_LIST_HELP_NAMES", "aide,a");

    let settings = Settings::load_from(None, "SIGCLI_TEST_LIST").expect("load");

    std::env::remove_var("SIGCLI_TEST_LIST_HELP_NAMES");
    assert_eq!(settings.help_names, vec!["aide".to_string(), "a".to_string()]);
}

#[test]
fn given_missing_config_file_when_loading_then_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let result = Settings::load_from(Some(&path), "SIGCLI_TEST_MISSING");

    assert!(result.is_err());
}

#[test]
fn given_narrow_width_in_file_when_loading_then_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "width = 10\n");

    let err = Settings::load_from(Some(&path), "SIGCLI_TEST_NARROW").unwrap_err();

    assert!(err.to_string().contains("width must be at least 20"), "{err}");
}

#[test]
fn given_help_name_with_space_when_loading_then_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "help_names = [\"show help\"]\n");

    let err = Settings::load_from(Some(&path), "SIGCLI_TEST_SPACE").unwrap_err();

    assert!(err.to_string().contains("invalid help name"), "{err}");
}

#[test]
fn given_settings_when_rendered_as_toml_then_loading_it_back_yields_same() {
    let original = Settings {
        width: 88,
        color: false,
        log_level: "debug".into(),
        ..Settings::default()
    };
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, &original.to_toml().expect("toml"));

    let loaded = Settings::load_from(Some(&path), "SIGCLI_TEST_ROUNDTRIP").expect("load");

    assert_eq!(loaded, original);
}
