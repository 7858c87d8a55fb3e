//! Core data types for the anchor watch

use serde::{Deserialize, Serialize};

/// Point on the Earth's surface in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point from untrusted coordinates.
    ///
    /// Returns `None` for non-finite values or coordinates outside
    /// -90..=90 / -180..=180.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if latitude.abs() > 90.0 || longitude.abs() > 180.0 {
            return None;
        }
        Some(Self { latitude, longitude })
    }
}

/// Vessel readings taken for one evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VesselState {
    /// GPS antenna position
    pub position: Option<GeoPoint>,
    /// True heading in radians
    pub heading_true: Option<f64>,
    /// Distance of the antenna from the bow in meters
    pub bow_offset: Option<f64>,
}

/// Anchor readings taken for one evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnchorState {
    pub position: Option<GeoPoint>,
    /// Allowed swing radius in meters
    pub max_radius: Option<f64>,
}
