//! # Logging
//!
//! Structured logging for the anchor watch, built on `tracing`.
//!
//! Library code only emits events. The binary installs a subscriber with
//! [`init_logging`], writing compact lines to the console, JSON lines to a
//! daily rolling file through a non-blocking writer, or both. `RUST_LOG`
//! takes precedence over the configured level.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::utils::config::LoggingConfig;

/// Log output destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Console only
    Console,
    /// Rolling file only
    File,
    /// Console and rolling file
    Both,
}

impl LogOutput {
    pub fn writes_console(&self) -> bool {
        matches!(self, LogOutput::Console | LogOutput::Both)
    }

    pub fn writes_file(&self) -> bool {
        matches!(self, LogOutput::File | LogOutput::Both)
    }
}

impl FromStr for LogOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "stdout" => Ok(LogOutput::Console),
            "file" => Ok(LogOutput::File),
            "both" | "all" => Ok(LogOutput::Both),
            _ => Err(format!("Invalid log output: {}. Expected console, file or both", s)),
        }
    }
}

/// Logging setup errors
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log level '{0}'")]
    InvalidLevel(String),
    #[error("Failed to create log directory '{path}': {source}")]
    Directory {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// Parse a level name, case-insensitively
pub fn parse_log_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Raise `level` by `verbosity` steps (`-v` flags), saturating at TRACE
pub fn raise_level(level: Level, verbosity: u8) -> Level {
    const ORDER: [Level; 5] = [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE];
    let current = ORDER.iter().position(|l| *l == level).unwrap_or(2);
    ORDER[(current + verbosity as usize).min(ORDER.len() - 1)]
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer when dropped and must be held
/// for as long as the program logs.
pub fn init_logging(config: &LoggingConfig, verbosity: u8) -> Result<Option<WorkerGuard>, LoggingError> {
    let level = parse_log_level(&config.level)
        .ok_or_else(|| LoggingError::InvalidLevel(config.level.clone()))?;
    let level = raise_level(level, verbosity);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let console_layer = config.output.writes_console().then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .compact()
    });

    let mut guard = None;
    let file_layer = if config.output.writes_file() {
        std::fs::create_dir_all(&config.log_dir).map_err(|source| LoggingError::Directory {
            path: config.log_dir.clone(),
            source,
        })?;
        let appender = rolling::daily(&config.log_dir, &config.file_prefix);
        let (writer, file_guard) = non_blocking(appender);
        guard = Some(file_guard);
        Some(fmt::layer().with_writer(writer).with_target(true).json())
    } else {
        None
    };

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(guard)
}
