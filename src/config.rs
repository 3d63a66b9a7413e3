//! Sealing configuration and the on-disk config file.
//!
//! The config file lives at `~/.commentseal/config.toml`. Every field is
//! optional; missing fields take the defaults below.
//!
//! ```toml
//! [seal]
//! max_payload = 48
//! scheme = "sealed"
//! max_item_len = 140   # 0 turns the size check off
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::CipherScheme;
use crate::frame::{DEFAULT_MAX_PAYLOAD, HEADER_LEN};

/// Default per-item size limit of the comment channel, in characters.
pub const DEFAULT_MAX_ITEM_LEN: usize = 140;

/// Config directory name under the home directory.
const CONFIG_DIR: &str = ".commentseal";

/// Config file name.
const CONFIG_FILE: &str = "config.toml";

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found. Unable to determine home directory.")]
    NoConfigDir,

    #[error("max_payload must be at least 1")]
    InvalidMaxPayload,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

/// How outgoing messages are framed and encrypted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SealConfig {
    /// Payload bytes per frame.
    pub max_payload: usize,

    /// Item cipher.
    pub scheme: CipherScheme,

    /// Largest item the channel accepts, in characters. `None` or `0`
    /// disables the check (`max_item_len = 0` in the config file).
    pub max_item_len: Option<usize>,
}

impl Default for SealConfig {
    fn default() -> Self {
        Self {
            max_payload: DEFAULT_MAX_PAYLOAD,
            scheme: CipherScheme::default(),
            max_item_len: Some(DEFAULT_MAX_ITEM_LEN),
        }
    }
}

impl SealConfig {
    /// Config for threads shared with earlier clients.
    pub fn legacy() -> Self {
        Self {
            scheme: CipherScheme::Legacy,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_payload == 0 {
            return Err(ConfigError::InvalidMaxPayload);
        }
        Ok(())
    }

    /// The item size limit to enforce, if any.
    pub fn item_limit(&self) -> Option<usize> {
        self.max_item_len.filter(|&max| max > 0)
    }

    /// Printable length of an item whose payload is entirely ASCII and full.
    pub fn full_item_len(&self) -> usize {
        self.scheme.item_len(HEADER_LEN + self.max_payload)
    }
}

/// Contents of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub seal: SealConfig,
}

impl Settings {
    /// Loads settings from `path`, or from the default location when `None`.
    ///
    /// A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.seal.validate()?;
        Ok(settings)
    }

    /// `~/.commentseal/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|h| h.join(CONFIG_DIR).join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SealConfig::default();
        assert_eq!(config.max_payload, 48);
        assert_eq!(config.scheme, CipherScheme::Sealed);
        assert_eq!(config.max_item_len, Some(140));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_frames_fit_default_limit() {
        assert!(SealConfig::default().full_item_len() <= DEFAULT_MAX_ITEM_LEN);
        assert!(SealConfig::legacy().full_item_len() <= DEFAULT_MAX_ITEM_LEN);
    }

    #[test]
    fn test_zero_payload_invalid() {
        let config = SealConfig {
            max_payload: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidMaxPayload)));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[seal]\nscheme = \"legacy\"\nmax_payload = 32\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.seal.scheme, CipherScheme::Legacy);
        assert_eq!(settings.seal.max_payload, 32);
        assert_eq!(settings.seal.max_item_len, Some(DEFAULT_MAX_ITEM_LEN));
    }

    #[test]
    fn test_load_zero_item_len_means_no_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[seal]\nmax_item_len = 0\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.seal.max_item_len, Some(0));
        assert_eq!(settings.seal.item_limit(), None);
        assert_eq!(SealConfig::default().item_limit(), Some(DEFAULT_MAX_ITEM_LEN));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "[seal]\nmax_payload = 0\n").unwrap();
        assert!(matches!(
            Settings::load(Some(&path)),
            Err(ConfigError::InvalidMaxPayload)
        ));

        fs::write(&path, "[seal]\nscheme = \"rot13\"\n").unwrap();
        assert!(matches!(
            Settings::load(Some(&path)),
            Err(ConfigError::TomlParseError(_))
        ));
    }

    #[test]
    fn test_toml_roundtrip() {
        let settings = Settings {
            seal: SealConfig::legacy(),
        };
        let text = toml::to_string_pretty(&settings).unwrap();
        let loaded: Settings = toml::from_str(&text).unwrap();
        assert_eq!(settings, loaded);
    }
}
