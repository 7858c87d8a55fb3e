//! Wire types published on the data bus
//!
//! Updates follow the Signal K delta layout: a context, a list of updates
//! tagged with their source, and a list of `{path, value}` pairs per update.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::SELF_CONTEXT;

/// Alarm state carried by a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmState {
    Normal,
    Alert,
    Warn,
    Alarm,
    Emergency,
}

/// How a notification should be presented by consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmMethod {
    Visual,
    Sound,
}

/// Notification value published when the alarm is raised
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub state: AlarmState,
    pub method: Vec<AlarmMethod>,
    pub message: String,
}

impl Notification {
    /// The notification raised when the bow leaves the swing circle
    pub fn radius_exceeded() -> Self {
        Self {
            state: AlarmState::Alarm,
            method: vec![AlarmMethod::Sound],
            message: "Anchor radius exceeded".to_string(),
        }
    }
}

/// A single `{path, value}` pair. `Value::Null` clears the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathValue {
    pub path: String,
    pub value: Value,
}

impl PathValue {
    pub fn new(path: impl Into<String>, value: Value) -> Self {
        Self { path: path.into(), value }
    }
}

/// Group of values published together by one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    #[serde(rename = "$source")]
    pub source: String,
    pub values: Vec<PathValue>,
}

/// Atomic update message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub context: String,
    pub updates: Vec<Update>,
}

impl Delta {
    /// Delta for the own vessel carrying a single update
    pub fn for_self(source: impl Into<String>, values: Vec<PathValue>) -> Self {
        Self {
            context: SELF_CONTEXT.to_string(),
            updates: vec![Update {
                source: source.into(),
                values,
            }],
        }
    }

    /// Iterate over every path/value pair in the delta
    pub fn values(&self) -> impl Iterator<Item = &PathValue> {
        self.updates.iter().flat_map(|update| update.values.iter())
    }

    /// Value published for `path`, if the delta carries it
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.values().find(|pv| pv.path == path).map(|pv| &pv.value)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notification_serializes_lowercase() {
        let value = serde_json::to_value(Notification::radius_exceeded()).unwrap();
        assert_eq!(
            value,
            json!({
                "state": "alarm",
                "method": ["sound"],
                "message": "Anchor radius exceeded",
            })
        );
    }

    #[test]
    fn test_delta_layout() {
        let delta = Delta::for_self(
            "test",
            vec![
                PathValue::new("navigation.anchor.currentRadius", json!(12.5)),
                PathValue::new("notifications.navigation.anchor", Value::Null),
            ],
        );

        let value: Value = serde_json::from_str(&delta.to_json().unwrap()).unwrap();
        assert_eq!(value["context"], "vessels.self");
        assert_eq!(value["updates"][0]["$source"], "test");
        assert_eq!(value["updates"][0]["values"][0]["value"], 12.5);
        assert!(value["updates"][0]["values"][1]["value"].is_null());
    }

    #[test]
    fn test_delta_get() {
        let delta = Delta::for_self("test", vec![PathValue::new("a.b", json!(1))]);
        assert_eq!(delta.get("a.b"), Some(&json!(1)));
        assert_eq!(delta.get("a.c"), None);
        assert_eq!(delta.values().count(), 1);
    }
}
