use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::logging::{parse_log_level, LogOutput};

/// Settings handed to the plugin by its host.
///
/// The anchor watch currently has no recognised options. Unknown keys are
/// ignored so a host may pass whatever it stores for the plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {}

impl PluginConfig {
    /// JSON schema of the settings object presented to the host
    pub fn schema() -> Value {
        json!({ "properties": {} })
    }
}

/// Logging configuration for the binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level filter: trace, debug, info, warn or error
    pub level: String,
    /// Where log events are written
    pub output: LogOutput,
    /// Directory of the rolling log file (file and both outputs)
    pub log_dir: String,
    /// File name prefix of the rolling log file
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: LogOutput::Console,
            log_dir: "logs".to_string(),
            file_prefix: "anchor-watch".to_string(),
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub plugin: PluginConfig,
    pub logging: LoggingConfig,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid parameter value
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Configuration file I/O error
    #[error("Failed to access config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON serialization/deserialization error
    #[error("Failed to parse config file '{path}': {source}")]
    Serialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AppConfig {
    /// Load and validate a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;

        let config: AppConfig = serde_json::from_str(&content).map_err(|source| {
            ConfigError::Serialization {
                path: path_str,
                source,
            }
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(self).map_err(|source| {
            ConfigError::Serialization {
                path: path_str.clone(),
                source,
            }
        })?;

        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path_str,
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let logging = &self.logging;

        if parse_log_level(&logging.level).is_none() {
            return Err(ConfigError::InvalidParameter {
                parameter: "logging.level".to_string(),
                value: logging.level.clone(),
                reason: "Expected one of trace, debug, info, warn, error".to_string(),
            });
        }

        if logging.output.writes_file() {
            if logging.log_dir.trim().is_empty() {
                return Err(ConfigError::InvalidParameter {
                    parameter: "logging.log_dir".to_string(),
                    value: logging.log_dir.clone(),
                    reason: "A log directory is required for file output".to_string(),
                });
            }
            if logging.file_prefix.trim().is_empty() {
                return Err(ConfigError::InvalidParameter {
                    parameter: "logging.file_prefix".to_string(),
                    value: logging.file_prefix.clone(),
                    reason: "A file prefix is required for file output".to_string(),
                });
            }
        }

        Ok(())
    }
}
