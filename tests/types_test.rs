//! Shelly API type deserialization tests

use shelly_exporter::shelly::{DeviceInfo, StatusSnapshot};

#[test]
fn test_device_info_deserialization() {
    // Given: A GetDeviceInfo response from a Plus 1PM
    let json = r#"{
        "name": "kitchen",
        "id": "shellyplus1pm-441793d69718",
        "mac": "441793D69718",
        "model": "SNSW-001P16EU",
        "gen": 2,
        "fw_id": "20230913-112003/v1.14.0-gcb84623",
        "ver": "1.14.0",
        "app": "Plus1PM",
        "auth_en": false,
        "auth_domain": null
    }"#;

    // When: Deserializing
    let info: DeviceInfo = serde_json::from_str(json).unwrap();

    // Then: Identity fields are populated and unknown fields ignored
    assert_eq!(info.name.as_deref(), Some("kitchen"));
    assert_eq!(info.gen, Some(2));
    assert_eq!(info.app.as_deref(), Some("Plus1PM"));
    assert_eq!(info.display_name(), "kitchen");
}

#[test]
fn test_device_info_null_name_falls_back_to_id() {
    // Given: A device that was never given a name
    let json = r#"{"name": null, "id": "shellyplus1-a8032ab12345"}"#;

    // When: Deserializing
    let info: DeviceInfo = serde_json::from_str(json).unwrap();

    // Then: The device id is used as display name
    assert_eq!(info.display_name(), "shellyplus1-a8032ab12345");
}

#[test]
fn test_device_info_without_name_or_id() {
    let info: DeviceInfo = serde_json::from_str("{}").unwrap();
    assert_eq!(info.display_name(), "");
}

#[test]
fn test_status_snapshot_keeps_component_keys() {
    // Given: A GetStatus response with top-level fields and components
    let json = r#"{
        "sys": {"uptime": 1234},
        "wifi": {"rssi": -60},
        "switch:0": {"id": 0, "output": true}
    }"#;

    // When: Deserializing into a snapshot
    let status: StatusSnapshot = serde_json::from_str(json).unwrap();

    // Then: All keys are preserved untyped
    assert_eq!(status.len(), 3);
    assert!(status.contains_key("switch:0"));
    assert_eq!(status["switch:0"]["output"], serde_json::Value::Bool(true));
}
