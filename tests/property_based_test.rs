//! Property-based tests using proptest
//!
//! Tests that verify properties hold for arbitrary inputs.

use proptest::prelude::*;
use serde_json::{json, Value};
use shelly_exporter::lookup::{lookup, LookupError};
use shelly_exporter::metrics::{CommonLabels, MetricsRegistry};

/// Wrap `leaf` in one nested object per segment
fn nest(path: &[String], leaf: Value) -> Value {
    path.iter().rev().fold(leaf, |inner, key| {
        let mut object = serde_json::Map::new();
        object.insert(key.clone(), inner);
        Value::Object(object)
    })
}

proptest! {
    #[test]
    fn test_lookup_returns_nested_leaf(
        path in prop::collection::vec("[a-zA-Z_][a-zA-Z0-9_]{0,8}", 1..6),
        leaf in -1e9f64..1e9,
    ) {
        // Given: A nested object built along an arbitrary path
        let data = nest(&path, json!(leaf));

        // When: Looking the path up
        let value = lookup(&data, &path).unwrap();

        // Then: The leaf comes back exactly
        prop_assert_eq!(value, &json!(leaf));
    }

    #[test]
    fn test_lookup_missing_first_segment_fails(
        path in prop::collection::vec("[a-z]{1,8}", 1..4),
    ) {
        // Given: A nested object whose first key is prefixed
        let mut stored = path.clone();
        stored[0] = format!("x{}", stored[0]);
        let data = nest(&stored, json!(1));

        // When: Looking up the unprefixed path
        let result = lookup(&data, &path);

        // Then: The first segment is reported missing
        let is_missing_key = matches!(result, Err(LookupError::MissingKey { .. }));
        prop_assert!(is_missing_key);
    }

    #[test]
    fn test_any_device_name_renders_without_panic(name in "\\PC*") {
        // Given: A registry and an arbitrary device name
        let metrics = MetricsRegistry::new().expect("Failed to create metrics");
        let labels = CommonLabels::new(name, "10.0.0.5", 0);
        let values = labels.values();
        let label_values: Vec<&str> = values.iter().map(String::as_str).collect();

        // When: Setting a gauge with that name as label
        metrics
            .gauge("shelly_switch_voltage", "Voltage", &[])
            .unwrap()
            .with_label_values(&label_values)
            .set(230.0);

        // Then: Rendering should not panic
        prop_assert!(metrics.render().is_ok());
    }

    #[test]
    fn test_any_gauge_value_reads_back(value in -1e18f64..1e18) {
        let metrics = MetricsRegistry::new().expect("Failed to create metrics");
        let gauge = metrics.gauge("shelly_switch_apower", "Power", &[]).unwrap();

        gauge.with_label_values(&["kitchen", "10.0.0.5", "0"]).set(value);

        prop_assert_eq!(gauge.with_label_values(&["kitchen", "10.0.0.5", "0"]).get(), value);
    }

    #[test]
    fn test_component_ids_do_not_collide(id1 in 0u32..1000, id2 in 1000u32..2000) {
        // Given: Two components of the same device
        let metrics = MetricsRegistry::new().expect("Failed to create metrics");
        let gauge = metrics.gauge("shelly_switch_current", "Current", &[]).unwrap();

        // When: Setting the same metric for both
        for id in [id1, id2] {
            let values = CommonLabels::new("kitchen", "10.0.0.5", id).values();
            let label_values: Vec<&str> = values.iter().map(String::as_str).collect();
            gauge.with_label_values(&label_values).set(f64::from(id));
        }

        // Then: Both series are rendered separately
        let rendered = metrics.render().unwrap();
        let id1_label = format!("component_id=\"{}\"", id1);
        let id2_label = format!("component_id=\"{}\"", id2);
        prop_assert!(rendered.contains(&id1_label));
        prop_assert!(rendered.contains(&id2_label));
    }
}
