//! Configuration
//!
//! JSON configuration file for the CLI surface: logging plus prober tuning.
//! Every field has a default; an empty object is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hls::ProbeConfig;
use crate::logging::LogConfig;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeetpanelConfig {
    /// Logging section
    pub log: LogConfig,
    /// Stream prober section
    pub prober: ProbeConfig,
}

impl MeetpanelConfig {
    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
