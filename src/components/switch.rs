//! Switch (relay channel) component
//!
//! # Metrics Produced
//! - `shelly_switch_voltage` - Supply voltage in volts
//! - `shelly_switch_current` - Current in amperes
//! - `shelly_switch_apower` - Instantaneous active power in watts
//! - `shelly_switch_temperature` - Internal temperature in degrees Celsius
//! - `shelly_switch_aenergy` - Total energy consumed in watt-hours
//! - `shelly_switch_output` - Relay output state (`Off` / `On`)
//!
//! All series carry the `name`, `ip` and `component_id` labels.

use super::{ComponentParser, ComponentType};
use crate::definitions::{EnumerationDefinition, GaugeDefinition};
use crate::error::Result;
use crate::lookup::MetricPath;

pub const OUTPUT_STATES: [&str; 2] = ["Off", "On"];

pub fn parser() -> Result<ComponentParser> {
    let definitions = vec![
        GaugeDefinition::new("voltage")
            .with_description("Shelly switch supply voltage in volts")
            .into(),
        GaugeDefinition::new("current")
            .with_description("Shelly switch current in amperes")
            .into(),
        GaugeDefinition::new("apower")
            .with_description("Shelly switch active power in watts")
            .into(),
        GaugeDefinition::new("temperature")
            .with_path(MetricPath::dotted("temperature.tC"))
            .with_description("Shelly switch temperature in degrees Celsius")
            .into(),
        GaugeDefinition::new("aenergy")
            .with_path(MetricPath::dotted("aenergy.total"))
            .with_description("Shelly switch total energy in watt-hours")
            .into(),
        EnumerationDefinition::new("output", OUTPUT_STATES)?
            .with_description("Shelly switch output state")
            .into(),
    ];

    Ok(ComponentParser::new(ComponentType::Switch, definitions))
}
