//! Prometheus Metrics Registry
//!
//! This module owns every Prometheus metric exposed by the Shelly exporter.
//!
//! Unlike a fixed table of metrics, component metrics are created lazily: the
//! first observation of a metric name registers it, and every later request for
//! the same name returns that same instance. The first writer wins; a later
//! request with a different description, label set or state list is ignored.
//!
//! # Metric Types
//!
//! - **GaugeVec**: numeric telemetry (voltage, power, temperature, ...)
//! - **EnumVec**: a state picked from a fixed set, exported as one series per
//!   state with a `state` label (1 for the current state, 0 for the others)
//! - **Gauge**: exporter self-metrics (`shelly_up`, collection duration)
//!
//! All metrics use the `shelly_` prefix.

use crate::error::{ExporterError, Result};
use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Label carrying the state name on enumeration series
pub const STATE_LABEL: &str = "state";

/// Labels identifying the origin of every component sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonLabels {
    /// Device display name
    pub name: String,
    /// Device address as given on the command line
    pub ip: String,
    /// Component instance id (`0` for `switch:0`)
    pub component_id: u32,
}

impl CommonLabels {
    pub const NAMES: [&'static str; 3] = ["name", "ip", "component_id"];

    pub fn new(name: impl Into<String>, ip: impl Into<String>, component_id: u32) -> Self {
        Self {
            name: name.into(),
            ip: ip.into(),
            component_id,
        }
    }

    /// Label values in the same order as [`CommonLabels::NAMES`]
    pub fn values(&self) -> [String; 3] {
        [
            self.name.clone(),
            self.ip.clone(),
            self.component_id.to_string(),
        ]
    }
}

/// A labelled enumeration metric
///
/// Holds one gauge series per declared state. Exactly one of them is 1 for a
/// given label combination once a state has been set.
pub struct EnumVec {
    name: String,
    states: Vec<String>,
    gauges: GaugeVec,
    selected: Mutex<HashMap<Vec<String>, String>>,
}

impl EnumVec {
    pub fn new(name: &str, help: &str, label_names: &[&str], states: &[String]) -> Result<Self> {
        if states.is_empty() {
            return Err(ExporterError::Validation(format!(
                "enumeration {} needs at least one state",
                name
            )));
        }

        let mut labels = label_names.to_vec();
        labels.push(STATE_LABEL);
        let gauges = GaugeVec::new(Opts::new(name, help), &labels)?;

        Ok(Self {
            name: name.to_string(),
            states: states.to_vec(),
            gauges,
            selected: Mutex::new(HashMap::new()),
        })
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.states.iter().any(|s| s == state)
    }

    /// Select `state` for the given label values
    ///
    /// Fails with [`ExporterError::InvalidState`] if `state` is not declared,
    /// leaving the existing series untouched.
    pub fn set(&self, label_values: &[&str], state: &str) -> Result<()> {
        if !self.has_state(state) {
            return Err(ExporterError::InvalidState {
                metric: self.name.clone(),
                value: state.to_string(),
            });
        }

        for candidate in &self.states {
            let mut values = label_values.to_vec();
            values.push(candidate.as_str());
            let value = if candidate == state { 1.0 } else { 0.0 };
            self.gauges.get_metric_with_label_values(&values)?.set(value);
        }

        let key: Vec<String> = label_values.iter().map(|v| v.to_string()).collect();
        self.selected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, state.to_string());
        Ok(())
    }

    /// Currently selected state for the given label values, if any was set
    ///
    /// Read-only: unseen label values do not create series.
    pub fn current(&self, label_values: &[&str]) -> Result<Option<String>> {
        let key: Vec<String> = label_values.iter().map(|v| v.to_string()).collect();
        Ok(self
            .selected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned())
    }

    fn collector(&self) -> Box<GaugeVec> {
        Box::new(self.gauges.clone())
    }
}

/// Kind-specific arguments for [`MetricsRegistry::get_or_create`]
#[derive(Debug, Clone, Copy)]
pub enum MetricKind<'a> {
    Gauge,
    Enumeration { states: &'a [String] },
}

/// Everything needed to create a metric on first use
#[derive(Debug, Clone, Copy)]
pub struct MetricSpec<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub extra_label_names: &'a [&'a str],
    pub kind: MetricKind<'a>,
}

/// A registered metric instance
#[derive(Clone)]
pub enum MetricHandle {
    Gauge(Arc<GaugeVec>),
    Enumeration(Arc<EnumVec>),
}

/// A sample resolved from a status snapshot but not yet written
///
/// A pass collects these for every component first and applies them only
/// once the whole snapshot has been read, so a failed pass leaves every
/// series at its previous value.
pub enum MetricUpdate {
    Gauge {
        gauge: Arc<GaugeVec>,
        label_values: Vec<String>,
        value: f64,
    },
    Enumeration {
        enumeration: Arc<EnumVec>,
        label_values: Vec<String>,
        state: String,
    },
}

impl MetricUpdate {
    pub fn apply(&self) -> Result<()> {
        match self {
            MetricUpdate::Gauge {
                gauge,
                label_values,
                value,
            } => {
                let values: Vec<&str> = label_values.iter().map(String::as_str).collect();
                gauge.get_metric_with_label_values(&values)?.set(*value);
                Ok(())
            }
            MetricUpdate::Enumeration {
                enumeration,
                label_values,
                state,
            } => {
                let values: Vec<&str> = label_values.iter().map(String::as_str).collect();
                enumeration.set(&values, state)
            }
        }
    }
}

/// Registry of all exported metrics
///
/// Cheap to clone; clones share the same underlying registry and instances.
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Arc<Registry>,
    instances: Arc<Mutex<HashMap<String, MetricHandle>>>,

    pub up: Arc<Gauge>,
    pub last_collection_duration_seconds: Arc<Gauge>,
}

impl MetricsRegistry {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let up = Gauge::with_opts(
            Opts::new("up", "Whether the last collection from the device succeeded")
                .namespace("shelly"),
        )?;

        let last_collection_duration_seconds = Gauge::with_opts(
            Opts::new(
                "last_collection_duration_seconds",
                "Duration of the last successful collection pass",
            )
            .namespace("shelly"),
        )?;

        registry.register(Box::new(up.clone()))?;
        registry.register(Box::new(last_collection_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            instances: Arc::new(Mutex::new(HashMap::new())),
            up: Arc::new(up),
            last_collection_duration_seconds: Arc::new(last_collection_duration_seconds),
        })
    }

    /// Return the metric registered under `spec.name`, creating it on first use
    ///
    /// Label names of a new metric are [`CommonLabels::NAMES`] followed by
    /// `spec.extra_label_names`.
    pub fn get_or_create(&self, spec: MetricSpec<'_>) -> Result<MetricHandle> {
        let mut instances = self
            .instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = instances.get(spec.name) {
            return Ok(existing.clone());
        }

        let mut label_names: Vec<&str> = CommonLabels::NAMES.to_vec();
        for extra in spec.extra_label_names {
            if !label_names.contains(extra) {
                label_names.push(extra);
            }
        }

        let handle = match spec.kind {
            MetricKind::Gauge => {
                let gauge = GaugeVec::new(Opts::new(spec.name, spec.description), &label_names)?;
                self.registry.register(Box::new(gauge.clone()))?;
                MetricHandle::Gauge(Arc::new(gauge))
            }
            MetricKind::Enumeration { states } => {
                let enumeration = EnumVec::new(spec.name, spec.description, &label_names, states)?;
                self.registry.register(enumeration.collector())?;
                MetricHandle::Enumeration(Arc::new(enumeration))
            }
        };

        instances.insert(spec.name.to_string(), handle.clone());
        Ok(handle)
    }

    pub fn gauge(
        &self,
        name: &str,
        description: &str,
        extra_label_names: &[&str],
    ) -> Result<Arc<GaugeVec>> {
        match self.get_or_create(MetricSpec {
            name,
            description,
            extra_label_names,
            kind: MetricKind::Gauge,
        })? {
            MetricHandle::Gauge(gauge) => Ok(gauge),
            MetricHandle::Enumeration(_) => {
                Err(ExporterError::MetricKindMismatch(name.to_string()))
            }
        }
    }

    pub fn enumeration(
        &self,
        name: &str,
        description: &str,
        extra_label_names: &[&str],
        states: &[String],
    ) -> Result<Arc<EnumVec>> {
        match self.get_or_create(MetricSpec {
            name,
            description,
            extra_label_names,
            kind: MetricKind::Enumeration { states },
        })? {
            MetricHandle::Enumeration(enumeration) => Ok(enumeration),
            MetricHandle::Gauge(_) => Err(ExporterError::MetricKindMismatch(name.to_string())),
        }
    }

    /// Number of component metrics created so far
    pub fn len(&self) -> usize {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
