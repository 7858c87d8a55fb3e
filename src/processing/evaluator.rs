//! Anchor watch evaluation
//!
//! One evaluation turns a snapshot of vessel and anchor readings into the
//! live swing radius, the bearing to the anchor and the alarm decision.
//! Nothing is carried over between evaluations.

use serde_json::Value;
use tracing::{debug, warn};

use crate::algorithms::geodesy::{bearing, deg_to_rad, destination, distance, rad_to_deg};
use crate::api::types::{Delta, Notification, PathValue};
use crate::core::{
    AnchorState, GeoPoint, VesselState, PATH_ANCHOR_BEARING_TRUE, PATH_ANCHOR_CURRENT_RADIUS,
    PATH_ANCHOR_NOTIFICATION,
};

/// Outcome of one evaluation. Every field is `None` when it cannot be
/// computed from the readings at hand.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvaluationResult {
    /// Bow position the radius was measured from. Not published.
    pub bow_position: Option<GeoPoint>,
    /// Distance from the bow to the anchor (m)
    pub current_radius: Option<f64>,
    /// True bearing from the bow to the anchor (rad, `[0, 2π)`)
    pub bearing_true: Option<f64>,
    /// Raised alarm, `None` when the alarm is clear
    pub alarm: Option<Notification>,
}

impl EvaluationResult {
    pub fn is_alarming(&self) -> bool {
        self.alarm.is_some()
    }

    /// The three values published after every evaluation. Absent values
    /// are published as `null` so consumers never keep a stale reading.
    pub fn to_delta(&self, source: &str) -> Delta {
        let alarm = self
            .alarm
            .as_ref()
            .and_then(|n| serde_json::to_value(n).ok())
            .unwrap_or(Value::Null);

        Delta::for_self(
            source,
            vec![
                PathValue::new(PATH_ANCHOR_CURRENT_RADIUS, number_or_null(self.current_radius)),
                PathValue::new(PATH_ANCHOR_BEARING_TRUE, number_or_null(self.bearing_true)),
                PathValue::new(PATH_ANCHOR_NOTIFICATION, alarm),
            ],
        )
    }
}

fn number_or_null(value: Option<f64>) -> Value {
    // from_f64 only fails for non-finite numbers
    value
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Position of the bow, projected forward from the GPS antenna along the
/// heading by the antenna's distance from the bow.
///
/// Without both heading and offset the antenna position is used as is. A
/// projection with no finite result leaves the bow position absent.
pub fn bow_position(vessel: &VesselState) -> Option<GeoPoint> {
    let antenna = vessel.position?;
    match (vessel.heading_true, vessel.bow_offset) {
        (Some(heading), Some(offset)) => {
            let bow = destination(&antenna, offset, rad_to_deg(heading));
            if bow.is_none() {
                debug!(heading, offset, "Bow projection has no finite result");
            }
            bow
        }
        _ => Some(antenna),
    }
}

/// Evaluate the anchor watch for one snapshot of readings
pub fn evaluate(vessel: &VesselState, anchor: &AnchorState) -> EvaluationResult {
    let bow = bow_position(vessel);

    let (current_radius, bearing_true) = match (bow, anchor.position) {
        (Some(bow), Some(anchor_position)) => (
            Some(distance(&bow, &anchor_position)),
            Some(deg_to_rad(bearing(&bow, &anchor_position))),
        ),
        _ => (None, None),
    };

    let alarm = match (anchor.max_radius, current_radius) {
        (Some(max_radius), Some(radius)) if radius > max_radius => {
            warn!(radius, max_radius, "Anchor radius exceeded");
            Some(Notification::radius_exceeded())
        }
        _ => None,
    };

    debug!(?current_radius, ?bearing_true, alarm = alarm.is_some(), "Anchor watch evaluated");

    EvaluationResult {
        bow_position: bow,
        current_radius,
        bearing_true,
        alarm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::AlarmState;
    use crate::api::types::AlarmMethod;
    use proptest::prelude::*;
    use serde_json::json;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn vessel_at(lat: f64, lon: f64) -> VesselState {
        VesselState {
            position: Some(point(lat, lon)),
            ..Default::default()
        }
    }

    fn anchor_at(lat: f64, lon: f64, max_radius: Option<f64>) -> AnchorState {
        AnchorState {
            position: Some(point(lat, lon)),
            max_radius,
        }
    }

    #[test]
    fn test_on_top_of_anchor() {
        let result = evaluate(&vessel_at(0.0, 0.0), &anchor_at(0.0, 0.0, Some(50.0)));
        assert_eq!(result.current_radius, Some(0.0));
        assert_eq!(result.bearing_true, Some(0.0));
        assert!(result.alarm.is_none());
    }

    #[test]
    fn test_outside_radius_raises_alarm() {
        let result = evaluate(&vessel_at(10.0, 20.0), &anchor_at(10.001, 20.0, Some(50.0)));

        let radius = result.current_radius.unwrap();
        assert!((radius - 111.2).abs() < 0.1, "radius was {}", radius);
        assert!(result.bearing_true.unwrap().abs() < 1e-9);

        let alarm = result.alarm.unwrap();
        assert_eq!(alarm.state, AlarmState::Alarm);
        assert_eq!(alarm.method, vec![AlarmMethod::Sound]);
        assert_eq!(alarm.message, "Anchor radius exceeded");
    }

    #[test]
    fn test_inside_radius_is_clear() {
        let result = evaluate(&vessel_at(10.0, 20.0), &anchor_at(10.001, 20.0, Some(200.0)));
        assert!((result.current_radius.unwrap() - 111.2).abs() < 0.1);
        assert!(!result.is_alarming());
    }

    #[test]
    fn test_missing_anchor_position() {
        let anchor = AnchorState {
            position: None,
            max_radius: Some(50.0),
        };
        let result = evaluate(&vessel_at(10.0, 20.0), &anchor);
        assert_eq!(result.current_radius, None);
        assert_eq!(result.bearing_true, None);
        assert_eq!(result.alarm, None);
        assert!(result.bow_position.is_some());
    }

    #[test]
    fn test_missing_vessel_position() {
        let vessel = VesselState {
            position: None,
            heading_true: Some(0.0),
            bow_offset: Some(5.0),
        };
        let result = evaluate(&vessel, &anchor_at(10.0, 20.0, Some(1.0)));
        assert_eq!(result, EvaluationResult::default());
    }

    #[test]
    fn test_missing_max_radius_never_alarms() {
        let result = evaluate(&vessel_at(10.0, 20.0), &anchor_at(11.0, 20.0, None));
        assert!(result.current_radius.unwrap() > 100_000.0);
        assert!(result.alarm.is_none());
    }

    #[test]
    fn test_radius_equal_to_max_does_not_alarm() {
        let vessel = vessel_at(10.0, 20.0);
        let anchor_position = point(10.001, 20.0);
        let exact = distance(&point(10.0, 20.0), &anchor_position);

        let at_limit = evaluate(&vessel, &AnchorState { position: Some(anchor_position), max_radius: Some(exact) });
        assert!(at_limit.alarm.is_none());

        let just_below = evaluate(
            &vessel,
            &AnchorState { position: Some(anchor_position), max_radius: Some(exact - 1e-6) },
        );
        assert!(just_below.alarm.is_some());
    }

    #[test]
    fn test_bow_offset_projects_along_heading() {
        let antenna = point(10.0, 20.0);
        let vessel = VesselState {
            position: Some(antenna),
            heading_true: Some(0.0),
            bow_offset: Some(5.0),
        };

        let bow = bow_position(&vessel).unwrap();
        assert!(bow.latitude > antenna.latitude);
        assert!((distance(&antenna, &bow) - 5.0).abs() < 1e-6);

        // Anchor 111m north: the bow is 5m closer than the antenna
        let result = evaluate(&vessel, &anchor_at(10.001, 20.0, Some(200.0)));
        let from_antenna = distance(&antenna, &point(10.001, 20.0));
        assert!((from_antenna - result.current_radius.unwrap() - 5.0).abs() < 1e-3);
        assert_eq!(result.bow_position, Some(bow));
    }

    #[test]
    fn test_bow_correction_needs_heading_and_offset() {
        let antenna = point(10.0, 20.0);
        let no_offset = VesselState {
            position: Some(antenna),
            heading_true: Some(1.0),
            bow_offset: None,
        };
        assert_eq!(bow_position(&no_offset), Some(antenna));

        let no_heading = VesselState {
            position: Some(antenna),
            heading_true: None,
            bow_offset: Some(12.0),
        };
        assert_eq!(bow_position(&no_heading), Some(antenna));
    }

    #[test]
    fn test_overflowing_heading_leaves_bow_absent() {
        let vessel = VesselState {
            position: Some(point(10.0, 20.0)),
            heading_true: Some(1e307),
            bow_offset: Some(5.0),
        };
        let result = evaluate(&vessel, &anchor_at(10.001, 20.0, Some(50.0)));

        assert_eq!(result.bow_position, None);
        assert_eq!(result.current_radius, None);
        assert_eq!(result.bearing_true, None);
        assert_eq!(result.alarm, None);

        let delta = result.to_delta("anchor");
        assert!(delta.values().all(|pv| pv.value.is_null()));
    }

    #[test]
    fn test_bearing_published_in_radians() {
        // Anchor due east
        let result = evaluate(&vessel_at(0.0, 0.0), &anchor_at(0.0, 0.001, None));
        let brg = result.bearing_true.unwrap();
        assert!((brg - std::f64::consts::FRAC_PI_2).abs() < 1e-6);

        // Anchor due south
        let result = evaluate(&vessel_at(0.0, 0.0), &anchor_at(-0.001, 0.0, None));
        assert!((result.bearing_true.unwrap() - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn test_to_delta_publishes_nulls_when_absent() {
        let delta = EvaluationResult::default().to_delta("anchor");
        assert_eq!(delta.get(PATH_ANCHOR_CURRENT_RADIUS), Some(&Value::Null));
        assert_eq!(delta.get(PATH_ANCHOR_BEARING_TRUE), Some(&Value::Null));
        assert_eq!(delta.get(PATH_ANCHOR_NOTIFICATION), Some(&Value::Null));
        assert_eq!(delta.values().count(), 3);
    }

    #[test]
    fn test_to_delta_with_alarm() {
        let result = evaluate(&vessel_at(10.0, 20.0), &anchor_at(10.001, 20.0, Some(50.0)));
        let delta = result.to_delta("anchor");

        assert_eq!(delta.updates[0].source, "anchor");
        assert!(delta.get(PATH_ANCHOR_CURRENT_RADIUS).unwrap().as_f64().unwrap() > 111.0);
        assert_eq!(
            delta.get(PATH_ANCHOR_NOTIFICATION),
            Some(&json!({"state": "alarm", "method": ["sound"], "message": "Anchor radius exceeded"}))
        );
    }

    proptest! {
        #[test]
        fn prop_derived_values_are_finite_or_absent(
            heading in any::<f64>().prop_filter("finite", |h| h.is_finite()),
            offset in any::<f64>().prop_filter("finite", |o| o.is_finite()),
            max_radius in 0.0f64..1e9,
        ) {
            let vessel = VesselState {
                position: Some(point(10.0, 20.0)),
                heading_true: Some(heading),
                bow_offset: Some(offset),
            };
            let result = evaluate(&vessel, &anchor_at(10.001, 20.0, Some(max_radius)));

            if let Some(bow) = result.bow_position {
                prop_assert!(bow.latitude.is_finite() && bow.longitude.is_finite());
            }
            prop_assert!(result.current_radius.map_or(true, |r| r.is_finite() && r >= 0.0));
            prop_assert!(result.bearing_true.map_or(true, f64::is_finite));
            prop_assert_eq!(result.current_radius.is_some(), result.bow_position.is_some());
        }
    }
}
