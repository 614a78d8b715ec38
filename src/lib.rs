//! Shelly Prometheus Exporter
//!
//! A Prometheus metrics exporter for Shelly Gen2+ smart relays.
//!
//! # Overview
//!
//! The exporter polls a device's local RPC API (`Shelly.GetDeviceInfo` and
//! `Shelly.GetStatus`) on a fixed-rate schedule and republishes the telemetry
//! of every recognised component as Prometheus metrics.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐      HTTP GET        ┌──────────────┐
//! │   Shelly    │ ◄─────────────────   │   Exporter   │
//! │   device    │   /rpc/Shelly.*      │              │
//! └─────────────┘                      │  ┌────────┐  │      HTTP      ┌────────────┐
//!                                      │  │Collect.│  │ ◄────────────► │ Prometheus │
//!                                      │  └────────┘  │   /metrics     └────────────┘
//!                                      │  ┌────────┐  │
//!                                      │  │Registry│  │
//!                                      │  └────────┘  │
//!                                      └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`shelly`] - HTTP client and API type definitions
//! - [`lookup`] - JSON field path resolution
//! - [`definitions`] - Declarative gauge/enumeration metric definitions
//! - [`components`] - Per component type parsers
//! - [`metrics`] - Lazily populated Prometheus registry
//! - [`collector`] - One polling pass
//! - [`server`] - HTTP server and fixed-rate schedule
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use shelly_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut config = Config::load("config/Default.toml")?;
//!     config.shelly.host = "192.168.1.20".to_string();
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod collector;
pub mod components;
pub mod config;
pub mod definitions;
pub mod error;
pub mod lookup;
pub mod metrics;
pub mod server;
pub mod shelly;
