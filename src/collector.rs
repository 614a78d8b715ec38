//! Device Collector
//!
//! One collection pass:
//! 1. Fetch the device name from `Shelly.GetDeviceInfo`
//! 2. Fetch the status snapshot from `Shelly.GetStatus`
//! 3. For every `"{type}:{id}"` key, build the common labels and hand the
//!    component object to the parser for that type
//!
//! # Error Handling
//!
//! Any failure aborts the pass and is returned to the caller. Every component
//! is resolved before any series is written, so a failed pass publishes
//! nothing and series set by an earlier pass keep their last value.
//! Component types without a parser follow [`UnknownComponentPolicy`].

use crate::components::{ComponentKey, ComponentParsers, ComponentType};
use crate::config::UnknownComponentPolicy;
use crate::error::{ExporterError, Result};
use crate::metrics::{CommonLabels, MetricsRegistry};
use crate::shelly::{ShellyClient, StatusSnapshot};
use tracing::{debug, info, warn};

/// Outcome of a successful pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    pub device_name: String,
    /// Components whose metrics were updated
    pub components: usize,
    /// Components ignored because their type has no parser
    pub skipped: usize,
}

pub struct Collector {
    client: ShellyClient,
    metrics: MetricsRegistry,
    parsers: ComponentParsers,
    unknown_components: UnknownComponentPolicy,
}

impl Collector {
    pub fn new(
        client: ShellyClient,
        metrics: MetricsRegistry,
        unknown_components: UnknownComponentPolicy,
    ) -> Result<Self> {
        Ok(Self {
            client,
            metrics,
            parsers: ComponentParsers::new()?,
            unknown_components,
        })
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Run one full pass against the device
    pub async fn collect(&self) -> Result<CollectionSummary> {
        let device_info = self.client.get_device_info().await?;
        let status = self.client.get_status().await?;

        let summary = self.collect_snapshot(device_info.display_name(), &status)?;
        info!(
            "Collected {} component(s) from {} ({})",
            summary.components,
            summary.device_name,
            self.client.host()
        );
        Ok(summary)
    }

    /// Update metrics from an already fetched status snapshot
    pub fn collect_snapshot(
        &self,
        device_name: &str,
        status: &StatusSnapshot,
    ) -> Result<CollectionSummary> {
        let ip = self.client.host();
        let mut summary = CollectionSummary {
            device_name: device_name.to_string(),
            components: 0,
            skipped: 0,
        };
        let mut pending = Vec::new();

        for (key, data) in status {
            let Some(component_key) = ComponentKey::parse(key)? else {
                continue;
            };

            let Some(component) = ComponentType::from_name(component_key.component) else {
                match self.unknown_components {
                    UnknownComponentPolicy::Fail => {
                        return Err(ExporterError::UnknownComponent {
                            component: component_key.component.to_string(),
                            ip: ip.to_string(),
                        });
                    }
                    UnknownComponentPolicy::Skip => {
                        warn!("Skipping unsupported component {} in {}", key, ip);
                        summary.skipped += 1;
                        continue;
                    }
                }
            };

            let labels = CommonLabels::new(device_name, ip, component_key.id);
            debug!("Parsing {} for {}", key, device_name);
            pending.extend(self.parsers.get(component).resolve(&self.metrics, &labels, data)?);
            summary.components += 1;
        }

        for update in &pending {
            update.apply()?;
        }
        Ok(summary)
    }
}
