use crate::core::config::data::{path_display, Config};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur when loading configuration from disk.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config at {}: {source}", path_display(path))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config at {}: {source}", path_display(path))]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Config {
    /// Load configuration from `config_path`. A missing file yields defaults.
    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })
    }

    /// Load from `--config` when given, else from the platform config dir.
    pub fn load(explicit_path: Option<&Path>) -> Result<Config, ConfigError> {
        match explicit_path.map(Path::to_path_buf).or_else(Self::get_config_path) {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Config::default()),
        }
    }

    /// `None` when the platform has no resolvable home directory.
    pub fn get_config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "mythicard", "mythicard")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
