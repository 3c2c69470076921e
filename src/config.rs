//! Configuration management for Cine-Rate
//!
//! Handles config file loading/saving and API key lookup.
//! Config is stored at ~/.config/cinerate/config.toml

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::tmdb::DEFAULT_BASE_URL;
use crate::models::DEFAULT_IMAGE_BASE_URL;

/// Environment variable checked before the config file
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no TMDB API key: set TMDB_API_KEY or tmdb_api_key in {0}")]
    MissingApiKey(String),

    #[error("could not read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// TMDB v3 API key
    pub tmdb_api_key: Option<String>,
    /// Catalog base URL (defaults to the public TMDB API)
    pub api_base_url: Option<String>,
    /// Image CDN base URL
    pub image_base_url: Option<String>,
    /// Ratings/wishlist file
    pub store_path: Option<PathBuf>,
    /// Directory for TUI log files
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Get config file path (~/.config/cinerate/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cinerate").join("config.toml"))
    }

    /// Load from the default path; a missing file is an empty config
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`; a missing file is an empty config
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// TMDB API key with fallback chain:
    /// 1. Environment variable TMDB_API_KEY
    /// 2. Key from config file
    pub fn api_key(&self) -> Result<String, ConfigError> {
        self.api_key_with(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_with(&self, env_key: Option<String>) -> Result<String, ConfigError> {
        env_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                self.tmdb_api_key
                    .clone()
                    .filter(|k| !k.trim().is_empty())
            })
            .ok_or_else(|| {
                let location = Self::path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "config.toml".to_string());
                ConfigError::MissingApiKey(location)
            })
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn image_base_url(&self) -> &str {
        self.image_base_url
            .as_deref()
            .unwrap_or(DEFAULT_IMAGE_BASE_URL)
    }

    /// Preferences file, default ~/.local/share/cinerate/preferences.json
    pub fn store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("cinerate")
                .join("preferences.json")
        })
    }

    /// Log directory, default ~/.cache/cinerate/logs
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("cinerate")
                .join("logs")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.tmdb_api_key.is_none());
        assert_eq!(config.api_base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.image_base_url(), DEFAULT_IMAGE_BASE_URL);
        assert!(config.store_path().ends_with("cinerate/preferences.json"));
    }

    #[test]
    fn test_api_key_precedence() {
        let config = Config {
            tmdb_api_key: Some("from-file".into()),
            ..Config::default()
        };
        assert_eq!(
            config.api_key_with(Some("from-env".into())).unwrap(),
            "from-env"
        );
        assert_eq!(config.api_key_with(None).unwrap(), "from-file");
        assert_eq!(
            config.api_key_with(Some("  ".into())).unwrap(),
            "from-file"
        );
    }

    #[test]
    fn test_missing_api_key() {
        let err = Config::default().api_key_with(None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey(_)));
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            tmdb_api_key: Some("abc".into()),
            api_base_url: Some("http://localhost:1234".into()),
            store_path: Some(dir.path().join("prefs.json")),
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "tmdb_api_key = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
