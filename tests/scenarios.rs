use std::rc::Rc;

use anchor_watch::core::*;
use anchor_watch::{evaluate, AnchorAlarmPlugin, AnchorState, GeoPoint, MemoryBus, PluginConfig, VesselState};
use serde_json::{json, Value};

fn point(lat: f64, lon: f64) -> Option<GeoPoint> {
    GeoPoint::new(lat, lon)
}

#[test]
fn scenario_vessel_over_anchor() {
    let vessel = VesselState { position: point(0.0, 0.0), ..Default::default() };
    let anchor = AnchorState { position: point(0.0, 0.0), max_radius: Some(50.0) };

    let result = evaluate(&vessel, &anchor);
    assert_eq!(result.current_radius, Some(0.0));
    assert_eq!(result.bearing_true, Some(0.0));
    assert!(result.alarm.is_none());
}

#[test]
fn scenario_alarm_raised_and_cleared_over_bus() {
    let bus = Rc::new(MemoryBus::new());
    bus.seed(PATH_POSITION, json!({"latitude": 10.0, "longitude": 20.0}));
    bus.seed(PATH_ANCHOR_POSITION, json!({"latitude": 10.001, "longitude": 20.0}));
    bus.seed(PATH_ANCHOR_MAX_RADIUS, json!(50));

    let mut plugin = AnchorAlarmPlugin::new(Rc::clone(&bus));
    plugin.start(PluginConfig::default());

    let alarmed = bus.last_published().unwrap();
    let radius = alarmed.get(PATH_ANCHOR_CURRENT_RADIUS).unwrap().as_f64().unwrap();
    assert!((radius - 111.2).abs() < 0.1);
    assert!(alarmed.get(PATH_ANCHOR_BEARING_TRUE).unwrap().as_f64().unwrap().abs() < 1e-9);
    assert_eq!(
        alarmed.get(PATH_ANCHOR_NOTIFICATION).unwrap(),
        &json!({"state": "alarm", "method": ["sound"], "message": "Anchor radius exceeded"})
    );

    bus.set(PATH_ANCHOR_MAX_RADIUS, json!(200));
    let cleared = bus.last_published().unwrap();
    assert_eq!(cleared.get(PATH_ANCHOR_NOTIFICATION), Some(&Value::Null));
    let radius = cleared.get(PATH_ANCHOR_CURRENT_RADIUS).unwrap().as_f64().unwrap();
    assert!((radius - 111.2).abs() < 0.1);

    plugin.stop();
    plugin.stop();
    assert_eq!(bus.subscription_count(), 0);
}

#[test]
fn scenario_anchor_position_unknown() {
    let bus = Rc::new(MemoryBus::new());
    bus.seed(PATH_POSITION, json!({"latitude": 10.0, "longitude": 20.0}));
    bus.seed(PATH_ANCHOR_MAX_RADIUS, json!(50));

    let mut plugin = AnchorAlarmPlugin::new(Rc::clone(&bus));
    plugin.start(PluginConfig::default());

    let delta = bus.last_published().unwrap();
    assert_eq!(delta.get(PATH_ANCHOR_CURRENT_RADIUS), Some(&Value::Null));
    assert_eq!(delta.get(PATH_ANCHOR_BEARING_TRUE), Some(&Value::Null));
    assert_eq!(delta.get(PATH_ANCHOR_NOTIFICATION), Some(&Value::Null));
}

#[test]
fn scenario_bow_offset_moves_reference_point() {
    let antenna = point(10.0, 20.0);
    let anchor = AnchorState { position: point(10.001, 20.0), max_radius: None };

    let raw = evaluate(&VesselState { position: antenna, ..Default::default() }, &anchor);
    let corrected = evaluate(
        &VesselState { position: antenna, heading_true: Some(0.0), bow_offset: Some(5.0) },
        &anchor,
    );

    let bow = corrected.bow_position.unwrap();
    assert!((anchor_watch::distance(&antenna.unwrap(), &bow) - 5.0).abs() < 1e-6);
    assert!(bow.latitude > 10.0);
    assert!((raw.current_radius.unwrap() - corrected.current_radius.unwrap() - 5.0).abs() < 1e-3);
}

#[test]
fn malformed_inputs_publish_nulls_not_nan() {
    let bus = Rc::new(MemoryBus::new());
    bus.seed(PATH_POSITION, json!({"latitude": "north", "longitude": 20.0}));
    bus.seed(PATH_ANCHOR_POSITION, json!({"latitude": 10.0, "longitude": 20.0}));
    bus.seed(PATH_ANCHOR_MAX_RADIUS, json!("-5"));
    bus.seed(PATH_HEADING_TRUE, json!("1e400"));

    let mut plugin = AnchorAlarmPlugin::new(Rc::clone(&bus));
    plugin.start(PluginConfig::default());

    let delta = bus.last_published().unwrap();
    for pv in delta.values() {
        assert!(pv.value.is_null(), "{} should be null", pv.path);
    }
    assert!(delta.to_json().unwrap().contains("null"));
}
