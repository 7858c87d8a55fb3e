//! Host-facing API: wire types and the plugin lifecycle

pub mod types;
pub mod plugin;

pub use types::{AlarmMethod, AlarmState, Delta, Notification, PathValue, Update};
pub use plugin::{run_cycle, AnchorAlarmPlugin};
