//! Spherical-earth geodesy
//!
//! Great-circle helpers on a sphere of radius [`EARTH_RADIUS_M`]. The
//! spherical model is accurate to well under a percent at anchoring
//! distances, which is all the anchor watch needs.
//!
//! Public distances are in meters and public angles in degrees. All
//! trigonometry is done in radians internally.

use crate::core::{GeoPoint, EARTH_RADIUS_M};

/// Convert degrees to radians. No wrapping or clamping is applied.
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Convert radians to degrees. No wrapping or clamping is applied.
pub fn rad_to_deg(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Great-circle distance between two points in meters (haversine)
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let d_lat = deg_to_rad(b.latitude - a.latitude);
    let d_lon = deg_to_rad(b.longitude - a.longitude);

    let h = (d_lat / 2.0).sin().powi(2)
        + deg_to_rad(a.latitude).cos()
            * deg_to_rad(b.latitude).cos()
            * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for near-antipodal points
    let h = h.clamp(0.0, 1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Initial great-circle bearing from `a` to `b` in degrees, in `[0, 360)`.
///
/// Identical points have no defined direction; they yield `0.0`.
pub fn bearing(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = deg_to_rad(a.latitude);
    let lat2 = deg_to_rad(b.latitude);
    let d_lon = deg_to_rad(b.longitude - a.longitude);

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    if y == 0.0 && x == 0.0 {
        return 0.0;
    }

    normalize_bearing(rad_to_deg(y.atan2(x)))
}

/// Point reached by travelling `distance_m` meters from `origin` on the
/// initial true bearing `bearing_deg`.
///
/// The resulting longitude is folded into `[-180, 180)`. Returns `None`
/// when the inputs are too large for the result to be finite.
pub fn destination(origin: &GeoPoint, distance_m: f64, bearing_deg: f64) -> Option<GeoPoint> {
    let theta = deg_to_rad(bearing_deg);
    let delta = distance_m / EARTH_RADIUS_M;
    let lat1 = deg_to_rad(origin.latitude);
    let lon1 = deg_to_rad(origin.longitude);

    let sin_lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).clamp(-1.0, 1.0);
    let lat2 = sin_lat2.asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * sin_lat2);

    GeoPoint::new(rad_to_deg(lat2), normalize_longitude(rad_to_deg(lon2)))
}

/// Fold a bearing in degrees into `[0, 360)`
pub fn normalize_bearing(degrees: f64) -> f64 {
    let folded = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if folded >= 360.0 {
        0.0
    } else {
        folded
    }
}

fn normalize_longitude(degrees: f64) -> f64 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}
