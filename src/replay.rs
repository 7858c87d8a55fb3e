//! Replay of recorded bus updates through the anchor watch
//!
//! A replay file seeds an in-memory bus, starts the plugin and then applies
//! each recorded update in order, collecting every delta the plugin
//! publishes.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::api::plugin::AnchorAlarmPlugin;
use crate::api::types::{Delta, PathValue};
use crate::bus::MemoryBus;
use crate::core::PATH_ANCHOR_NOTIFICATION;
use crate::utils::config::PluginConfig;

/// Replay failures
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read replay file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse replay file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Recorded bus state and updates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    /// Values present on the bus before the plugin starts
    pub initial: BTreeMap<String, Value>,
    /// Updates applied after start, in order
    pub steps: Vec<PathValue>,
}

impl ReplayScript {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReplayError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = fs::read_to_string(&path).map_err(|source| ReplayError::Io {
            path: path_str.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ReplayError::Parse {
            path: path_str,
            source,
        })
    }
}

/// Run a script through a fresh plugin and return every published delta
pub fn run_replay(script: &ReplayScript, config: PluginConfig) -> Vec<Delta> {
    let bus = Rc::new(MemoryBus::new());
    for (path, value) in &script.initial {
        bus.seed(path, value.clone());
    }

    let mut plugin = AnchorAlarmPlugin::new(Rc::clone(&bus));
    plugin.start(config);
    for step in &script.steps {
        bus.set(&step.path, step.value.clone());
    }
    plugin.stop();

    let published = bus.published();
    let alarms = published
        .iter()
        .filter(|d| d.get(PATH_ANCHOR_NOTIFICATION).is_some_and(|v| !v.is_null()))
        .count();
    info!(steps = script.steps.len(), evaluations = published.len(), alarms, "Replay finished");

    published
}
