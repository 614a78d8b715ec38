//! Declarative Metric Definitions
//!
//! A [`MetricDefinition`] describes how one field of a component's status
//! object becomes a Prometheus series: which path to read, what the metric is
//! called and how the raw JSON value is interpreted.
//!
//! Exported names are `shelly_{component_type}_{metric_name}`, so the switch
//! definition `voltage` becomes `shelly_switch_voltage`.
//!
//! `resolve` reads and checks a value without touching any series and returns
//! a [`MetricUpdate`]. `parse_from_data` resolves and applies in one step.

use crate::components::ComponentType;
use crate::error::{ExporterError, Result};
use crate::lookup::MetricPath;
use crate::metrics::{CommonLabels, MetricUpdate, MetricsRegistry};
use serde_json::Value;

/// A numeric field exported as a gauge
#[derive(Debug, Clone)]
pub struct GaugeDefinition {
    name: String,
    path: MetricPath,
    description: Option<String>,
}

impl GaugeDefinition {
    /// Gauge read from the field of the same name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: MetricPath::single(name.clone()),
            name,
            description: None,
        }
    }

    pub fn with_path(mut self, path: MetricPath) -> Self {
        self.path = path;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn resolve(
        &self,
        registry: &MetricsRegistry,
        labels: &CommonLabels,
        data: &Value,
        component: ComponentType,
    ) -> Result<MetricUpdate> {
        let raw = self.path.resolve(data)?;
        let value = coerce_f64(raw).ok_or_else(|| ExporterError::Coercion {
            path: self.path.to_string(),
            value: raw.clone(),
        })?;

        let gauge = registry.gauge(
            &exported_name(component, &self.name),
            &describe(self.description.as_deref(), component, &self.name),
            &[],
        )?;
        Ok(MetricUpdate::Gauge {
            gauge,
            label_values: labels.values().to_vec(),
            value,
        })
    }

    pub fn parse_from_data(
        &self,
        registry: &MetricsRegistry,
        labels: &CommonLabels,
        data: &Value,
        component: ComponentType,
    ) -> Result<()> {
        self.resolve(registry, labels, data, component)?.apply()
    }
}

/// A field taking one of a fixed set of states
#[derive(Debug, Clone)]
pub struct EnumerationDefinition {
    name: String,
    path: MetricPath,
    description: Option<String>,
    states: Vec<String>,
}

impl EnumerationDefinition {
    /// `states[0]` is used for `false` and `states[1]` for `true` when the
    /// source field is a boolean. Fails if `states` is empty.
    pub fn new<I, S>(name: impl Into<String>, states: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let states: Vec<String> = states.into_iter().map(Into::into).collect();
        if states.is_empty() {
            return Err(ExporterError::Validation(format!(
                "enumeration {} needs at least one state",
                name
            )));
        }

        Ok(Self {
            path: MetricPath::single(name.clone()),
            name,
            description: None,
            states,
        })
    }

    pub fn with_path(mut self, path: MetricPath) -> Self {
        self.path = path;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn resolve(
        &self,
        registry: &MetricsRegistry,
        labels: &CommonLabels,
        data: &Value,
        component: ComponentType,
    ) -> Result<MetricUpdate> {
        let raw = self.path.resolve(data)?;
        let state = self.state_for(raw)?;

        let enumeration = registry.enumeration(
            &exported_name(component, &self.name),
            &describe(self.description.as_deref(), component, &self.name),
            &[],
            &self.states,
        )?;
        // Checked against the registered instance, whose states may differ
        if !enumeration.has_state(state) {
            return Err(ExporterError::InvalidState {
                metric: self.name.clone(),
                value: state.to_string(),
            });
        }

        Ok(MetricUpdate::Enumeration {
            enumeration,
            label_values: labels.values().to_vec(),
            state: state.to_string(),
        })
    }

    pub fn parse_from_data(
        &self,
        registry: &MetricsRegistry,
        labels: &CommonLabels,
        data: &Value,
        component: ComponentType,
    ) -> Result<()> {
        self.resolve(registry, labels, data, component)?.apply()
    }

    fn state_for<'a>(&'a self, raw: &'a Value) -> Result<&'a str> {
        let state = match raw {
            Value::Bool(on) => self.states.get(usize::from(*on)).map(String::as_str),
            Value::String(s) => Some(s.as_str()),
            _ => None,
        };
        state.ok_or_else(|| ExporterError::InvalidState {
            metric: self.name.clone(),
            value: raw.to_string(),
        })
    }
}

/// How a component field is turned into a metric
#[derive(Debug, Clone)]
pub enum MetricDefinition {
    Gauge(GaugeDefinition),
    Enumeration(EnumerationDefinition),
}

impl MetricDefinition {
    pub fn metric_name(&self) -> &str {
        match self {
            MetricDefinition::Gauge(d) => &d.name,
            MetricDefinition::Enumeration(d) => &d.name,
        }
    }

    pub fn metric_path(&self) -> &MetricPath {
        match self {
            MetricDefinition::Gauge(d) => &d.path,
            MetricDefinition::Enumeration(d) => &d.path,
        }
    }

    pub fn resolve(
        &self,
        registry: &MetricsRegistry,
        labels: &CommonLabels,
        data: &Value,
        component: ComponentType,
    ) -> Result<MetricUpdate> {
        match self {
            MetricDefinition::Gauge(d) => d.resolve(registry, labels, data, component),
            MetricDefinition::Enumeration(d) => d.resolve(registry, labels, data, component),
        }
    }

    pub fn parse_from_data(
        &self,
        registry: &MetricsRegistry,
        labels: &CommonLabels,
        data: &Value,
        component: ComponentType,
    ) -> Result<()> {
        self.resolve(registry, labels, data, component)?.apply()
    }
}

impl From<GaugeDefinition> for MetricDefinition {
    fn from(definition: GaugeDefinition) -> Self {
        MetricDefinition::Gauge(definition)
    }
}

impl From<EnumerationDefinition> for MetricDefinition {
    fn from(definition: EnumerationDefinition) -> Self {
        MetricDefinition::Enumeration(definition)
    }
}

/// `shelly_{component}_{metric}`
pub fn exported_name(component: ComponentType, metric_name: &str) -> String {
    format!("shelly_{}_{}", component.as_str(), metric_name)
}

fn describe(description: Option<&str>, component: ComponentType, metric_name: &str) -> String {
    match description {
        Some(d) => d.to_string(),
        None => format!("Shelly {} {}", component.as_str(), metric_name),
    }
}

/// Numbers pass through, booleans become 0/1 and numeric strings are parsed
fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
