//! Physical constants and data bus paths

/// Mean Earth radius used by the spherical model (m)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Context every subscription is registered against
pub const SELF_CONTEXT: &str = "vessels.self";

/// GPS antenna position of the vessel
pub const PATH_POSITION: &str = "navigation.position";
/// Dropped anchor position
pub const PATH_ANCHOR_POSITION: &str = "navigation.anchor.position";
/// Allowed swing radius around the anchor (m)
pub const PATH_ANCHOR_MAX_RADIUS: &str = "navigation.anchor.maxRadius";
/// True heading (rad)
pub const PATH_HEADING_TRUE: &str = "navigation.headingTrue";
/// Distance of the GPS antenna from the bow (m)
pub const PATH_GPS_FROM_BOW: &str = "sensors.gps.fromBow";

/// Distance from the bow to the anchor (m)
pub const PATH_ANCHOR_CURRENT_RADIUS: &str = "navigation.anchor.currentRadius";
/// True bearing from the bow to the anchor (rad)
pub const PATH_ANCHOR_BEARING_TRUE: &str = "navigation.anchor.bearingTrue";
/// Anchor alarm notification
pub const PATH_ANCHOR_NOTIFICATION: &str = "notifications.navigation.anchor";

/// Every path whose update triggers a new evaluation
pub const INPUT_PATHS: [&str; 5] = [
    PATH_ANCHOR_POSITION,
    PATH_ANCHOR_MAX_RADIUS,
    PATH_POSITION,
    PATH_HEADING_TRUE,
    PATH_GPS_FROM_BOW,
];
