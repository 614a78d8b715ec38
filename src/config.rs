use anyhow::{bail, Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub shelly: ShellyConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ShellyConfig {
    /// Device hostname or IP, optionally with `:port`
    #[serde(default)]
    pub host: String,
    /// Unset means outbound requests wait indefinitely
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_scrape_interval")]
    pub scrape_interval_seconds: u64,
    #[serde(default)]
    pub unknown_components: UnknownComponentPolicy,
}

/// What a collection pass does with a component type it has no parser for
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnknownComponentPolicy {
    /// Abort the whole pass
    #[default]
    Fail,
    /// Log a warning and continue with the next component
    Skip,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            scrape_interval_seconds: default_scrape_interval(),
            unknown_components: UnknownComponentPolicy::default(),
        }
    }
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_scrape_interval() -> u64 {
    5
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("SHELLY_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Check the settings that have no usable default
    pub fn validate(&self) -> Result<()> {
        if self.shelly.host.trim().is_empty() {
            bail!("Shelly device host is not set (pass it as the first argument)");
        }
        if self.metrics.scrape_interval_seconds == 0 {
            bail!("metrics.scrape_interval_seconds must be greater than 0");
        }
        Ok(())
    }
}
