use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::constants::{
    BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_KEY_CHECK_TIMEOUT_SECS, DEFAULT_MODEL,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TEMPERATURE, MODEL_ENV, TEMPERATURE_RANGE,
};
use crate::core::credentials::default_credential_from;

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Default credential, used when neither the caller nor the environment
    /// supplies one.
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    /// Sampling temperature, clamped to 0.0-2.0.
    pub temperature: Option<f32>,
    pub request_timeout_secs: Option<u64>,
    pub key_check_timeout_secs: Option<u64>,
}

/// Where the effective default credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Environment,
    ConfigFile,
}

/// Effective settings after applying defaults and environment overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub api_key_source: Option<ApiKeySource>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub request_timeout: Duration,
    pub key_check_timeout: Duration,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    /// Resolve against the process environment.
    pub fn resolve(&self) -> Settings {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    pub(crate) fn resolve_with<F>(&self, lookup: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let (api_key, api_key_source) = match default_credential_from(&lookup) {
            Some(key) => (Some(key), Some(ApiKeySource::Environment)),
            None => match non_blank(self.api_key.clone()) {
                Some(key) => (Some(key), Some(ApiKeySource::ConfigFile)),
                None => (None, None),
            },
        };

        let model = non_blank(lookup(MODEL_ENV))
            .or_else(|| non_blank(self.model.clone()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = non_blank(lookup(BASE_URL_ENV))
            .or_else(|| non_blank(self.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let temperature = self
            .temperature
            .filter(|value| value.is_finite())
            .unwrap_or(DEFAULT_TEMPERATURE)
            .clamp(TEMPERATURE_RANGE.0, TEMPERATURE_RANGE.1);

        Settings {
            api_key,
            api_key_source,
            model,
            base_url,
            temperature,
            request_timeout: Duration::from_secs(
                self.request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            key_check_timeout: Duration::from_secs(
                self.key_check_timeout_secs
                    .unwrap_or(DEFAULT_KEY_CHECK_TIMEOUT_SECS),
            ),
        }
    }
}

/// Display a path with the home directory collapsed to `~`.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
