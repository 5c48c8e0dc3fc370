//! Runtime switches of a session.

use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error loading a [`MirrorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The config is not valid JSON or has fields of the wrong type.
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Switches controlling what a [`Session`][`crate::Session`] does.
///
/// Missing fields take their default values.
///
/// ```
/// use lineage::MirrorConfig;
///
/// let config = MirrorConfig::from_json_str(r#"{ "description_limit": 8 }"#)?;
/// assert!(config.snapshots_enabled);
/// assert_eq!(config.description_limit, Some(8));
/// # Ok::<(), lineage::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Produce snapshots at frame ticks.
    pub snapshots_enabled: bool,
    /// Consult the session's geometry cache when hit testing.
    pub geometry_cache_enabled: bool,
    /// Maximum length of descriptions in characters. `None` keeps them whole.
    pub description_limit: Option<usize>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            snapshots_enabled: true,
            geometry_cache_enabled: true,
            description_limit: Some(20),
        }
    }
}

impl MirrorConfig {
    /// Parses a config from JSON.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Reads a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<FsPath>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serializes the config as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
