//! Config resolution tests.
//!
//! These tests mutate `TAGNORM_CONFIG`, so they run serially.

use std::io::Write;

use serial_test::serial;
use tagnorm::config::{CONFIG_ENV_VAR, EngineConfig};
use tagnorm::{LabelOccurrence, SourceKind, TagEngineBuilder};
use tempfile::NamedTempFile;
use time::OffsetDateTime;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("failed to write config");
    file
}

#[test]
#[serial]
fn test_env_var_names_config_file() {
    // Arrange
    let file = write_config(r#"{"max_distance": 1, "similarity_threshold": 0.9}"#);
    unsafe {
        std::env::set_var(CONFIG_ENV_VAR, file.path());
    }

    // Act
    let config = EngineConfig::resolve(None);

    // Clean up
    unsafe {
        std::env::remove_var(CONFIG_ENV_VAR);
    }

    // Assert
    let config = config.expect("config should load");
    assert_eq!(config.max_distance, 1);
    assert_eq!(config.similarity_threshold, 0.9);
}

#[test]
#[serial]
fn test_explicit_path_beats_env_var() {
    // Arrange
    let env_file = write_config(r#"{"max_value_len": 10}"#);
    let explicit_file = write_config(r#"{"max_value_len": 20}"#);
    unsafe {
        std::env::set_var(CONFIG_ENV_VAR, env_file.path());
    }

    // Act
    let config = EngineConfig::resolve(Some(explicit_file.path()));

    // Clean up
    unsafe {
        std::env::remove_var(CONFIG_ENV_VAR);
    }

    // Assert
    assert_eq!(config.expect("config should load").max_value_len, 20);
}

#[test]
#[serial]
fn test_env_var_pointing_nowhere_is_an_error() {
    unsafe {
        std::env::set_var(CONFIG_ENV_VAR, "/nonexistent/tagnorm/config.json");
    }

    let result = EngineConfig::resolve(None);

    unsafe {
        std::env::remove_var(CONFIG_ENV_VAR);
    }

    let err = result.expect_err("missing config should fail");
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_configured_patterns_drive_grouping() {
    // Arrange
    let file = write_config(
        r#"{"patterns": [{"canonical": "harbor", "variants": ["harbour", "habour"]}]}"#,
    );
    let config = EngineConfig::load(file.path()).expect("config should load");
    let engine = TagEngineBuilder::from_config(&config).build();
    let now = OffsetDateTime::now_utc();
    let occurrences: Vec<LabelOccurrence> = ["harbour", "habour", "latx"]
        .into_iter()
        .map(|value| LabelOccurrence::new(SourceKind::Folder, value, None, now))
        .collect();

    // Act
    let variants = engine.group(&occurrences);

    // Assert
    let harbor = variants
        .iter()
        .find(|v| v.canonical() == "harbor")
        .expect("harbor variant");
    assert_eq!(harbor.count(), 2);
    // The built-in table is replaced, so latx keeps its own spelling.
    assert!(variants.iter().any(|v| v.canonical() == "latx"));
}

#[test]
fn test_strict_config_limits_value_length() {
    let file = write_config(r#"{"max_value_len": 8}"#);
    let config = EngineConfig::load(file.path()).expect("config should load");
    let engine = TagEngineBuilder::from_config(&config).build();

    let result = engine.process_labels(&tagnorm::LabelInput::new("a_rather_long_name.jpg"));
    assert!(result.is_err());
}
