//! Shelly RPC API Type Definitions
//!
//! Only `Shelly.GetDeviceInfo` has a typed response. `Shelly.GetStatus` is kept
//! as a raw JSON object because its keys depend on the components the device
//! reports (`switch:0`, `input:0`, `sys`, `wifi`, ...).

#![allow(dead_code)] // Keep the identity fields the API returns even if unused
use serde::Deserialize;

/// Response of `Shelly.GetDeviceInfo`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceInfo {
    /// User-assigned name, `null` until configured on the device
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub gen: Option<u32>,
    #[serde(default)]
    pub fw_id: Option<String>,
    #[serde(default)]
    pub ver: Option<String>,
    #[serde(default)]
    pub app: Option<String>,
}

impl DeviceInfo {
    /// Name used for the `name` label: the configured name, else the device id
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or_default()
    }
}

/// Response of `Shelly.GetStatus`
pub type StatusSnapshot = serde_json::Map<String, serde_json::Value>;
