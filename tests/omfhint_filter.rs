use std::sync::Arc;
use std::thread;

use serde_json::json;

use omfhint::{
    ConfigManager, Datapoint, DatapointValue, InMemoryAssetTracker, OmfHintFilter, Reading,
    DEFAULT_CONFIG, FILTER_EVENT, OMF_HINT_DATAPOINT,
};

fn enabled_filter(hints: &str) -> (OmfHintFilter, Arc<InMemoryAssetTracker>) {
    let tracker = Arc::new(InMemoryAssetTracker::new());
    let config = ConfigManager::custom().enabled(true).hints(hints).build();
    (OmfHintFilter::new(&config, tracker.clone()), tracker)
}

fn omf_hint(reading: &Reading) -> Option<String> {
    reading
        .datapoints
        .iter()
        .find(|dp| dp.name == OMF_HINT_DATAPOINT)
        .map(|dp| match &dp.value {
            DatapointValue::String(s) => s.clone(),
            other => panic!("OMFHint must be a string, got {:?}", other),
        })
}

fn single(filter: &OmfHintFilter, reading: Reading) -> Reading {
    let mut out = filter.ingest(vec![reading]);
    assert_eq!(out.len(), 1);
    out.remove(0)
}

#[test]
fn test_plugin_disabled() {
    let category = r#"{
        "hints": {"value": "{ \"test\":{\"number\":\"uint64\", \"datapoint\":{ \"name\":\"Temperature\",\"integer\":\"uint64\"}} }"},
        "enable": {"value": "false"}
    }"#;
    let tracker = Arc::new(InMemoryAssetTracker::new());
    let filter = OmfHintFilter::from_category("omfhint", category, tracker.clone()).unwrap();

    let out = single(&filter, Reading::new("test", vec![Datapoint::new("test", 2i64)]));
    assert_eq!(out.datapoint_count(), 1);
    assert_eq!(tracker.event_count(), 0);
}

#[test]
fn test_plugin_add_asset_datapoint_hint() {
    let category = r#"{
        "hints": {"value": "{ \"test\" : {\"number\" : \"uint64\", \"datapoint\" : { \"name\" : \"Temperature\",\"integer\" : \"uint64\"}} }"},
        "enable": {"value": "true"}
    }"#;
    let tracker = Arc::new(InMemoryAssetTracker::new());
    let filter = OmfHintFilter::from_category("omfhint", category, tracker.clone()).unwrap();

    let out = single(&filter, Reading::new("test", vec![Datapoint::new("test", 2i64)]));
    assert_eq!(out.datapoint_count(), 2);
    assert_eq!(out.datapoints[0].name, "test");
    assert_eq!(out.datapoints[1].name, "OMFHint");
    assert_eq!(
        omf_hint(&out).unwrap(),
        r#"{\"number\":\"uint64\",\"datapoint\":{\"name\":\"Temperature\",\"integer\":\"uint64\"}}"#
    );
    assert!(tracker.contains("omfhint", "test", FILTER_EVENT));
}

#[test]
fn test_default_config_is_disabled() {
    let tracker = Arc::new(InMemoryAssetTracker::new());
    let filter = OmfHintFilter::from_category("omfhint", DEFAULT_CONFIG, tracker).unwrap();
    assert!(!filter.is_enabled());
    assert_eq!(filter.rules().len(), 1);

    filter.set_enabled(true);
    let out = single(&filter, Reading::new("asset", vec![]));
    assert_eq!(omf_hint(&out).unwrap(), r#"{\"number\":\"float64\"}"#);
}

#[test]
fn test_datapoint_placeholder() {
    let (filter, _) =
        enabled_filter(r#"{"motor4": {"datapoint":[{"name":"voltage","uom":"$voltage_uom$"}]}}"#);
    let out = single(
        &filter,
        Reading::new("motor4", vec![Datapoint::new("voltage_uom", "Volt")]),
    );
    assert_eq!(
        omf_hint(&out).unwrap(),
        r#"{\"datapoint\":[{\"name\":\"voltage\",\"uom\":\"Volt\"}]}"#
    );
}

#[test]
fn test_asset_and_field_placeholders() {
    let (filter, _) = enabled_filter(r#"{"Camera": {"AFLocation":"/UK/$city$/$ASSET$"}}"#);

    let out = single(&filter, Reading::new("Camera", vec![Datapoint::new("city", "London")]));
    assert_eq!(omf_hint(&out).unwrap(), r#"{\"AFLocation\":\"/UK/London/Camera\"}"#);

    // 缺少 city 数据点：占位符保留，ASSET 仍被替换
    let out = single(&filter, Reading::new("Camera", vec![Datapoint::new("town", "Leeds")]));
    assert_eq!(omf_hint(&out).unwrap(), r#"{\"AFLocation\":\"/UK/$city$/Camera\"}"#);
}

#[test]
fn test_unpaired_trailing_delimiter() {
    let (filter, _) = enabled_filter(r#"{"Camera": {"AFLocation":"/UK/$floor$ASSET$"}}"#);
    let out = single(&filter, Reading::new("Camera", vec![Datapoint::new("floor", 12i64)]));
    assert_eq!(omf_hint(&out).unwrap(), r#"{\"AFLocation\":\"/UK/12ASSET$\"}"#);
}

#[test]
fn test_pattern_rule_full_match() {
    let (filter, tracker) = enabled_filter(r#"{"sensor\\..*": {"type": "sensor"}}"#);
    let out = filter.ingest(vec![
        Reading::new("sensor.temp", vec![]),
        Reading::new("sensorXtemp", vec![]),
        Reading::new("old.sensor.temp", vec![]),
    ]);
    assert_eq!(omf_hint(&out[0]).unwrap(), r#"{\"type\":\"sensor\"}"#);
    assert!(omf_hint(&out[1]).is_none());
    assert!(omf_hint(&out[2]).is_none());
    assert_eq!(tracker.event_count(), 1);
}

#[test]
fn test_unsupported_datapoint_type() {
    let (filter, _) = enabled_filter(r#"{"Camera": {"image": "$frame$", "at": "$ASSET$"}}"#);
    let out = single(
        &filter,
        Reading::new(
            "Camera",
            vec![Datapoint::new("frame", DatapointValue::Other(json!({"width": 640, "height": 480})))],
        ),
    );
    assert_eq!(omf_hint(&out).unwrap(), r#"{\"image\":\"$frame$\",\"at\":\"Camera\"}"#);
}

#[test]
fn test_numeric_placeholders() {
    let (filter, _) = enabled_filter(r#"{"tank.*": {"level": "$level$", "count": "$count$"}}"#);
    let out = single(
        &filter,
        Reading::new(
            "tank-7",
            vec![Datapoint::new("level", 0.5f64), Datapoint::new("count", -42i64)],
        ),
    );
    assert_eq!(omf_hint(&out).unwrap(), r#"{\"level\":\"0.500000\",\"count\":\"-42\"}"#);
}

#[test]
fn test_malformed_pattern_matches_exact_text() {
    let (filter, _) = enabled_filter(r#"{"pump(1": {"p": 1}}"#);
    let out = filter.ingest(vec![Reading::new("pump(1", vec![]), Reading::new("pump1", vec![])]);
    assert_eq!(omf_hint(&out[0]).unwrap(), r#"{\"p\":1}"#);
    assert!(omf_hint(&out[1]).is_none());
}

#[test]
fn test_duplicate_pattern_key_first_declared_wins() {
    let (filter, _) = enabled_filter(r#"{"a.*": {"v": 1}, "a.*": {"v": 2}}"#);
    assert_eq!(filter.rules().pattern_count(), 2);
    let out = single(&filter, Reading::new("abc", vec![]));
    assert_eq!(omf_hint(&out).unwrap(), r#"{\"v\":1}"#);
}

#[test]
fn test_order_and_count_preserved() {
    let (filter, tracker) = enabled_filter(r#"{"a": {"x": 1}, "c.*": {"y": 2}}"#);
    let assets = ["a", "b", "c1", "a", "d", "c"];
    let readings = assets.iter().map(|a| Reading::new(*a, vec![])).collect();

    let out = filter.ingest(readings);
    let names: Vec<&str> = out.iter().map(|r| r.asset_name()).collect();
    assert_eq!(names, assets);
    let annotated: Vec<bool> = out.iter().map(|r| omf_hint(r).is_some()).collect();
    assert_eq!(annotated, vec![true, false, true, true, false, true]);
    assert_eq!(tracker.event_count(), 4);
}

#[test]
fn test_reading_json_round_trip_through_filter() {
    let (filter, _) = enabled_filter(r#"{"Camera": {"AFLocation":"/UK/$city$"}}"#);
    let reading: Reading =
        serde_json::from_str(r#"{"asset_code":"Camera","reading":{"city":"London"}}"#).unwrap();
    let out = single(&filter, reading);
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["reading"]["city"], "London");
    assert_eq!(json["reading"]["OMFHint"], r#"{\"AFLocation\":\"/UK/London\"}"#);
}

#[test]
fn test_concurrent_ingest_and_reconfigure() {
    let (filter, _) = enabled_filter(r#"{"motor": {"v": 1}}"#);
    let filter = Arc::new(filter);

    let writer = {
        let filter = Arc::clone(&filter);
        thread::spawn(move || {
            for i in 0..200 {
                let v = if i % 2 == 0 { 2 } else { 1 };
                filter.set_hints(&format!(r#"{{"motor": {{"v": {v}}}}}"#));
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let filter = Arc::clone(&filter);
            thread::spawn(move || {
                for _ in 0..200 {
                    let out = filter.ingest(vec![Reading::new("motor", vec![])]);
                    let hint = omf_hint(&out[0]).expect("rule table is never partially built");
                    assert!(hint == r#"{\"v\":1}"# || hint == r#"{\"v\":2}"#);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}
