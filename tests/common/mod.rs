//! Shared helpers for integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use shelly_exporter::collector::Collector;
use shelly_exporter::config::{ShellyConfig, UnknownComponentPolicy};
use shelly_exporter::metrics::MetricsRegistry;
use shelly_exporter::shelly::{ShellyClient, StatusSnapshot};

pub const DEVICE_IP: &str = "10.0.0.5";

pub fn create_test_metrics() -> MetricsRegistry {
    MetricsRegistry::new().expect("Failed to create metrics")
}

/// Collector pointed at `host`; no request is made until `collect` is called
pub fn create_collector(
    host: &str,
    metrics: &MetricsRegistry,
    policy: UnknownComponentPolicy,
) -> Collector {
    let client = ShellyClient::new(&ShellyConfig {
        host: host.to_string(),
        request_timeout_seconds: Some(5),
    })
    .expect("Failed to create client");
    Collector::new(client, metrics.clone(), policy).expect("Failed to create collector")
}

/// Status object of one switch channel
pub fn switch_data() -> Value {
    json!({
        "id": 0,
        "source": "init",
        "output": true,
        "apower": 115.0,
        "voltage": 230.1,
        "current": 0.5,
        "aenergy": {"total": 12.4, "by_minute": [0.0, 0.0, 0.0], "minute_ts": 1700000000},
        "temperature": {"tC": 41.2, "tF": 106.2}
    })
}

pub fn snapshot(value: Value) -> StatusSnapshot {
    match value {
        Value::Object(map) => map,
        other => panic!("snapshot must be an object, got {}", other),
    }
}

/// Value of `name` for the kitchen device and the given component id
pub fn gauge_value(metrics: &MetricsRegistry, name: &str, component_id: &str) -> f64 {
    metrics
        .gauge(name, "", &[])
        .expect("metric is not a gauge")
        .with_label_values(&["kitchen", DEVICE_IP, component_id])
        .get()
}
