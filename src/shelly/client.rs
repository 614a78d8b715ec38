//! Shelly RPC HTTP Client
//!
//! Gen2+ Shelly devices expose their RPC methods as plain HTTP GET endpoints
//! under `/rpc/<Method>`. The exporter needs two of them:
//!
//! - `Shelly.GetDeviceInfo` for the device name
//! - `Shelly.GetStatus` for the telemetry snapshot
//!
//! Non-2xx responses are turned into errors; nothing is retried.

use crate::config::ShellyConfig;
use crate::error::Result;
use crate::shelly::types::{DeviceInfo, StatusSnapshot};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Client for a single Shelly device
#[derive(Clone)]
pub struct ShellyClient {
    client: reqwest::Client,
    base_url: String,
    host: String,
}

impl ShellyClient {
    pub fn new(config: &ShellyConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("shelly-exporter/", env!("CARGO_PKG_VERSION")));
        if let Some(seconds) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let trimmed = config.host.trim_end_matches('/');
        let host = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))
            .unwrap_or(trimmed);
        let base_url = if host.len() == trimmed.len() {
            format!("http://{}", host)
        } else {
            trimmed.to_string()
        };

        Ok(Self {
            client: builder.build()?,
            base_url,
            host: host.to_string(),
        })
    }

    /// Device address without scheme, used for the `ip` label
    pub fn host(&self) -> &str {
        &self.host
    }

    /// `http://` is assumed when the configured host has no scheme
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_device_info(&self) -> Result<DeviceInfo> {
        self.call("Shelly.GetDeviceInfo").await
    }

    pub async fn get_status(&self) -> Result<StatusSnapshot> {
        self.call("Shelly.GetStatus").await
    }

    fn rpc_url(&self, method: &str) -> String {
        format!("{}/rpc/{}", self.base_url, method)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str) -> Result<T> {
        let url = self.rpc_url(method);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
