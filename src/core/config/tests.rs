use super::data::{ApiKeySource, Config};
use super::io::ConfigError;
use crate::core::constants::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use std::collections::HashMap;
use std::time::Duration;
use tempfile::TempDir;

fn lookup_from(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    let env: HashMap<&'static str, &'static str> = pairs.iter().copied().collect();
    move |name: &str| env.get(name).map(|value| value.to_string())
}

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_load_full_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
api_key = "file-key"
model = "gemini-1.5-pro"
base_url = "http://localhost:8080/v1beta"
temperature = 0.4
request_timeout_secs = 30
key_check_timeout_secs = 3
"#,
    )
    .expect("write failed");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(config.api_key.as_deref(), Some("file-key"));
    assert_eq!(config.model.as_deref(), Some("gemini-1.5-pro"));
    assert_eq!(config.temperature, Some(0.4));
    assert_eq!(config.key_check_timeout_secs, Some(3));
}

#[test]
fn test_invalid_toml_reports_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "temperature = \"warm\"").expect("write failed");

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse config at "));
}

#[test]
fn test_explicit_path_is_used() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("alt.toml");
    std::fs::write(&config_path, "model = \"gemini-exp\"").expect("write failed");

    let config = Config::load(Some(config_path.as_path())).expect("Failed to load config");
    assert_eq!(config.model.as_deref(), Some("gemini-exp"));
}

#[test]
fn test_defaults_apply_when_unset() {
    let settings = Config::default().resolve_with(lookup_from(&[]));

    assert_eq!(settings.api_key, None);
    assert_eq!(settings.api_key_source, None);
    assert_eq!(settings.model, DEFAULT_MODEL);
    assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    assert_eq!(settings.temperature, DEFAULT_TEMPERATURE);
    assert_eq!(settings.request_timeout, Duration::from_secs(60));
    assert_eq!(settings.key_check_timeout, Duration::from_secs(10));
}

#[test]
fn test_environment_overrides_file() {
    let config = Config {
        api_key: Some("file-key".to_string()),
        model: Some("file-model".to_string()),
        base_url: Some("http://file".to_string()),
        ..Default::default()
    };

    let settings = config.resolve_with(lookup_from(&[
        ("GOOGLE_API_KEY", "env-key"),
        ("MYTHICARD_MODEL", "env-model"),
        ("MYTHICARD_BASE_URL", "http://env"),
    ]));
    assert_eq!(settings.api_key.as_deref(), Some("env-key"));
    assert_eq!(settings.api_key_source, Some(ApiKeySource::Environment));
    assert_eq!(settings.model, "env-model");
    assert_eq!(settings.base_url, "http://env");
}

#[test]
fn test_empty_environment_values_count_as_unset() {
    let config = Config {
        api_key: Some("file-key".to_string()),
        ..Default::default()
    };

    let settings = config.resolve_with(lookup_from(&[
        ("GEMINI_API_KEY", ""),
        ("MYTHICARD_MODEL", "  "),
    ]));
    assert_eq!(settings.api_key.as_deref(), Some("file-key"));
    assert_eq!(settings.api_key_source, Some(ApiKeySource::ConfigFile));
    assert_eq!(settings.model, DEFAULT_MODEL);
}

#[test]
fn test_temperature_is_clamped() {
    let hot = Config {
        temperature: Some(3.5),
        ..Default::default()
    };
    assert_eq!(hot.resolve_with(lookup_from(&[])).temperature, 2.0);

    let cold = Config {
        temperature: Some(-0.5),
        ..Default::default()
    };
    assert_eq!(cold.resolve_with(lookup_from(&[])).temperature, 0.0);
}
