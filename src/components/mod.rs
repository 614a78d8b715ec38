//! Component Parsers
//!
//! A Shelly device reports each logical sub-unit under a `"{type}:{id}"` key in
//! its status snapshot. Every supported type has a [`ComponentParser`]: a fixed
//! list of [`MetricDefinition`]s applied to that component's JSON object.
//!
//! Supported types form the closed [`ComponentType`] enum, so adding a type
//! means adding a variant and the compiler points at every place that needs a
//! parser for it.

use crate::definitions::MetricDefinition;
use crate::error::{ExporterError, Result};
use crate::metrics::{CommonLabels, MetricUpdate, MetricsRegistry};
use serde_json::Value;
use std::fmt;

pub mod switch;

/// Component types the exporter knows how to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Switch,
}

impl ComponentType {
    /// Look up a type by the name used in status keys
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "switch" => Some(ComponentType::Switch),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::Switch => "switch",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status snapshot key split into its type name and numeric id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentKey<'a> {
    pub component: &'a str,
    pub id: u32,
}

impl<'a> ComponentKey<'a> {
    /// Parse `"switch:0"`
    ///
    /// Returns `Ok(None)` for keys without a `:` (top-level fields such as
    /// `sys` or `wifi`) and an error when the id is not an unsigned integer.
    pub fn parse(key: &'a str) -> Result<Option<Self>> {
        let Some((component, id)) = key.split_once(':') else {
            return Ok(None);
        };
        let id: u32 = id
            .parse()
            .map_err(|_| ExporterError::InvalidComponentKey(key.to_string()))?;
        Ok(Some(Self { component, id }))
    }
}

/// Metric definitions for one component type
#[derive(Debug, Clone)]
pub struct ComponentParser {
    component: ComponentType,
    definitions: Vec<MetricDefinition>,
}

impl ComponentParser {
    pub fn new(component: ComponentType, definitions: Vec<MetricDefinition>) -> Self {
        Self {
            component,
            definitions,
        }
    }

    pub fn definitions(&self) -> &[MetricDefinition] {
        &self.definitions
    }

    /// Resolve every definition against `data`, stopping at the first error
    pub fn resolve(
        &self,
        registry: &MetricsRegistry,
        labels: &CommonLabels,
        data: &Value,
    ) -> Result<Vec<MetricUpdate>> {
        self.definitions
            .iter()
            .map(|definition| definition.resolve(registry, labels, data, self.component))
            .collect()
    }

    /// Resolve every definition, then write them all
    ///
    /// Nothing is written if any definition fails.
    pub fn parse(
        &self,
        registry: &MetricsRegistry,
        labels: &CommonLabels,
        data: &Value,
    ) -> Result<()> {
        for update in self.resolve(registry, labels, data)? {
            update.apply()?;
        }
        Ok(())
    }
}

/// One parser per [`ComponentType`]
#[derive(Debug, Clone)]
pub struct ComponentParsers {
    switch: ComponentParser,
}

impl ComponentParsers {
    pub fn new() -> Result<Self> {
        Ok(Self {
            switch: switch::parser()?,
        })
    }

    pub fn get(&self, component: ComponentType) -> &ComponentParser {
        match component {
            ComponentType::Switch => &self.switch,
        }
    }
}
