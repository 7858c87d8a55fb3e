//! Headless Anchor Alarm
//!
//! Watches the distance from a vessel's bow to its dropped anchor and raises
//! an alarm when the vessel leaves the allowed swing radius. Readings come
//! from a pub/sub data bus; the live radius, the bearing to the anchor and
//! the alarm notification are published back to it after every update.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod bus;
pub mod api;
pub mod utils;
pub mod logging;
pub mod replay;

// Re-export commonly used types
pub use crate::core::{AnchorState, GeoPoint, VesselState, EARTH_RADIUS_M};
pub use algorithms::geodesy::{bearing, deg_to_rad, destination, distance, rad_to_deg};
pub use processing::evaluator::{evaluate, EvaluationResult};
pub use bus::{BusError, BusValue, DataBus, MemoryBus, Subscription, SubscriptionHandle};
pub use api::{AnchorAlarmPlugin, Delta, Notification, PathValue};
pub use utils::config::{AppConfig, PluginConfig};
