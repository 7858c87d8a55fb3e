//! Resolution of raw bus values into typed readings
//!
//! Values on the bus are loosely typed JSON. A reading that is missing,
//! `null`, of the wrong shape or not a finite number resolves to `None`;
//! it never becomes zero and never aborts the evaluation.

use serde_json::Value;
use tracing::debug;

use crate::bus::DataBus;
use crate::core::{
    AnchorState, GeoPoint, VesselState, PATH_ANCHOR_MAX_RADIUS, PATH_ANCHOR_POSITION,
    PATH_GPS_FROM_BOW, PATH_HEADING_TRUE, PATH_POSITION,
};

/// Coerce a JSON value into a finite number.
///
/// Numbers and numeric strings are accepted. Everything else, and any
/// non-finite result, is absent.
pub fn resolve_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    number.is_finite().then_some(number)
}

/// Coerce a JSON object with `latitude` and `longitude` members into a point
pub fn resolve_position(value: &Value) -> Option<GeoPoint> {
    let latitude = value.get("latitude").and_then(resolve_number)?;
    let longitude = value.get("longitude").and_then(resolve_number)?;
    GeoPoint::new(latitude, longitude)
}

/// Coerce a swing radius. Negative radii are rejected.
pub fn resolve_radius(value: &Value) -> Option<f64> {
    resolve_number(value).filter(|r| *r >= 0.0)
}

fn read_with<B, T>(bus: &B, path: &str, resolve: fn(&Value) -> Option<T>) -> Option<T>
where
    B: DataBus + ?Sized,
{
    let raw = bus.read(path)?;
    let resolved = resolve(&raw.value);
    if resolved.is_none() && !raw.value.is_null() {
        debug!(path, value = %raw.value, "Ignoring unusable value");
    }
    resolved
}

/// Read a fresh snapshot of the vessel readings from the bus
pub fn resolve_vessel<B: DataBus + ?Sized>(bus: &B) -> VesselState {
    VesselState {
        position: read_with(bus, PATH_POSITION, resolve_position),
        heading_true: read_with(bus, PATH_HEADING_TRUE, resolve_number),
        bow_offset: read_with(bus, PATH_GPS_FROM_BOW, resolve_number),
    }
}

/// Read a fresh snapshot of the anchor readings from the bus
pub fn resolve_anchor<B: DataBus + ?Sized>(bus: &B) -> AnchorState {
    AnchorState {
        position: read_with(bus, PATH_ANCHOR_POSITION, resolve_position),
        max_radius: read_with(bus, PATH_ANCHOR_MAX_RADIUS, resolve_radius),
    }
}
