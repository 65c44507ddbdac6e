/*!
 * Tests for application configuration functionality
 */

use anki_carder::app_config::{Config, ConfigOverrides, LogLevel};
use anyhow::Result;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.input_path, PathBuf::from("input.yaml"));
    assert_eq!(config.cache_path, PathBuf::from("Pairs.json"));
    assert_eq!(config.endpoint_url, "http://localhost:8765");
    assert_eq!(config.api_version, 6);
    assert_eq!(config.probe_timeout(), Duration::from_secs(5));
    assert_eq!(config.submit_delay(), Duration::from_millis(100));
    assert_eq!(config.request_timeout(), None);
    assert_eq!(config.note.default_deck, "Українська");
    assert_eq!(config.note.model_name, "Basic");
    assert_eq!(config.note.tags, vec!["anki_carder".to_string()]);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.endpoint_url = "not a url".to_string();
    assert!(config.validate().is_err());

    config.endpoint_url = "ftp://localhost:8765".to_string();
    assert!(config.validate().is_err());

    config.endpoint_url = "https://anki.local:8765".to_string();
    assert!(config.validate().is_ok());

    config.note.default_deck = "   ".to_string();
    assert!(config.validate().is_err());
    config.note.default_deck = "Deutsch".to_string();

    config.note.model_name = String::new();
    assert!(config.validate().is_err());
    config.note.model_name = "Basic".to_string();

    config.probe_timeout_secs = 0;
    assert!(config.validate().is_err());
    config.probe_timeout_secs = 5;

    config.cache_path = PathBuf::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() -> Result<()> {
    let config: Config = serde_json::from_str(
        r#"{ "endpoint_url": "http://127.0.0.1:9999", "note": { "default_deck": "Deutsch" } }"#,
    )?;

    assert_eq!(config.endpoint_url, "http://127.0.0.1:9999");
    assert_eq!(config.note.default_deck, "Deutsch");
    assert_eq!(config.note.model_name, "Basic");
    assert_eq!(config.submit_delay_ms, 100);
    assert_eq!(config.input_path, PathBuf::from("input.yaml"));
    Ok(())
}

#[test]
fn test_loadOrDefault_withMissingFile_shouldUseDefaultsWithoutWriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("anki_carder.json");

    let config = Config::load_or_default(&path)?;

    assert!(!path.exists());
    assert_eq!(config.endpoint_url, "http://localhost:8765");
    assert_eq!(config.note.default_deck, "Українська");
    Ok(())
}

#[test]
fn test_loadOrDefault_withMissingDirectory_shouldStillSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("missing_dir").join("anki_carder.json");

    let config = Config::load_or_default(&path)?;

    assert_eq!(config.cache_path, PathBuf::from("Pairs.json"));
    assert!(!temp_dir.path().join("missing_dir").exists());
    Ok(())
}

#[test]
fn test_loadOrDefault_withExistingFile_shouldReadIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "anki_carder.json",
        r#"{ "submit_delay_ms": 250, "log_level": "debug" }"#,
    )?;

    let config = Config::load_or_default(&path)?;

    assert_eq!(config.submit_delay_ms, 250);
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_loadOrDefault_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "anki_carder.json", "{ not json")?;

    assert!(Config::load_or_default(&path).is_err());
    Ok(())
}

#[test]
fn test_writeDefault_shouldCreateLoadableFileAndRefuseToOverwrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("anki_carder.json");

    Config::write_default(&path, false)?;
    assert!(path.exists());

    let reloaded = Config::load_or_default(&path)?;
    assert_eq!(reloaded.endpoint_url, "http://localhost:8765");

    assert!(Config::write_default(&path, false).is_err());
    assert!(Config::write_default(&path, true).is_ok());
    Ok(())
}

#[test]
fn test_applyOverrides_withCommandLineValues_shouldReplaceFileValues() {
    let mut config = Config {
        endpoint_url: "http://127.0.0.1:9999".to_string(),
        log_level: LogLevel::Warn,
        ..Config::default()
    };

    config.apply_overrides(ConfigOverrides {
        input_path: Some(PathBuf::from("words.yaml")),
        cache_path: Some(PathBuf::from("out/pairs.json")),
        endpoint_url: Some("http://localhost:8766".to_string()),
        log_level: Some(LogLevel::Trace),
    });

    assert_eq!(config.input_path, PathBuf::from("words.yaml"));
    assert_eq!(config.cache_path, PathBuf::from("out/pairs.json"));
    assert_eq!(config.endpoint_url, "http://localhost:8766");
    assert_eq!(config.log_level, LogLevel::Trace);
}

#[test]
fn test_applyOverrides_withNoValues_shouldKeepFileValues() {
    let mut config = Config {
        input_path: PathBuf::from("deutsch.yaml"),
        endpoint_url: "http://127.0.0.1:9999".to_string(),
        log_level: LogLevel::Warn,
        ..Config::default()
    };

    config.apply_overrides(ConfigOverrides::default());

    assert_eq!(config.input_path, PathBuf::from("deutsch.yaml"));
    assert_eq!(config.cache_path, PathBuf::from("Pairs.json"));
    assert_eq!(config.endpoint_url, "http://127.0.0.1:9999");
    assert_eq!(config.log_level, LogLevel::Warn);
}

#[test]
fn test_logLevel_conversion_shouldMapToLevelFilter() {
    assert_eq!(LevelFilter::from(&LogLevel::Error), LevelFilter::Error);
    assert_eq!(LevelFilter::from(&LogLevel::Debug), LevelFilter::Debug);
    assert_eq!(LevelFilter::from(&LogLevel::default()), LevelFilter::Info);
}
