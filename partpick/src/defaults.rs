//! Parameter defaulting pass
//!
//! Runs once over the finished board, before resolution. Only unbound slots
//! are filled, so anything the board author fixed explicitly is kept.

use serde::{Deserialize, Serialize};

use crate::graph::{ComponentId, ComponentKind, CompositeKind, Design, DesignError};
use crate::issue::{Issue, Severity};
use crate::parameter::{ParamKind, Parameter};
use crate::units::{milli, nano, K};

pub const DEFAULTED_CAPACITOR_RULE: &str = "defaulted_capacitance";

/// Values the defaulting pass fills in, in SI base units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterDefaults {
    /// Pull resistor of every power switch (ohms)
    pub pull_resistance: f64,
    /// Capacitors left unbound by the board (farads)
    pub capacitance: f64,
    pub led_forward_voltage: f64,
    pub led_forward_current: f64,
    /// Supply the LED series resistor is sized against (volts)
    pub led_supply_voltage: f64,
    /// Series resistor range as multiples of the computed resistance;
    /// larger resistance dims the LED
    pub led_dimming: (f64, f64),
}

impl Default for ParameterDefaults {
    fn default() -> Self {
        Self {
            pull_resistance: 100.0 * K,
            capacitance: nano(100.0),
            led_forward_voltage: 2.0,
            led_forward_current: milli(10.0),
            led_supply_voltage: 5.0,
            led_dimming: (2.0, 4.0),
        }
    }
}

/// Series resistance that drives an LED at its forward current.
pub fn needed_series_resistance(
    supply_voltage: f64,
    forward_voltage: f64,
    forward_current: f64,
) -> f64 {
    (supply_voltage - forward_voltage) / forward_current
}

/// Fill unbound parameters and designators; returns informational issues.
pub fn fill_defaults(design: &mut Design, defaults: &ParameterDefaults) -> Result<Vec<Issue>, DesignError> {
    let mut issues = Vec::new();

    let ids: Vec<ComponentId> = design.component_ids().collect();
    for id in ids {
        let kind = design.component(id).kind;
        match kind {
            ComponentKind::Composite {
                composite: CompositeKind::PowerSwitch,
            } => {
                let pull = design.child(id, "pull_resistor")?;
                bind_if_unbound(
                    design,
                    pull,
                    ParamKind::Resistance,
                    Parameter::fixed(defaults.pull_resistance),
                )?;
            }
            ComponentKind::Composite {
                composite: CompositeKind::PoweredLed,
            } => {
                fill_powered_led(design, id, defaults)?;
            }
            ComponentKind::Capacitor => {
                if design.param(id, ParamKind::Capacitance).is_none() {
                    let path = design.path(id);
                    tracing::warn!("Found capacitor with TBD value at {}", path);
                    design.bind_param(
                        id,
                        ParamKind::Capacitance,
                        Parameter::fixed(defaults.capacitance),
                    )?;
                    issues.push(
                        Issue::new(
                            DEFAULTED_CAPACITOR_RULE,
                            Severity::Info,
                            format!(
                                "Capacitance of {} was unset, defaulted to {}",
                                path,
                                Parameter::fixed(defaults.capacitance).display("F")
                            ),
                        )
                        .with_component(path),
                    );
                }
            }
            ComponentKind::Led => design.set_designator(id, "D"),
            ComponentKind::Mosfet { .. } => design.set_designator(id, "Q"),
            _ => {}
        }
    }

    Ok(issues)
}

fn fill_powered_led(
    design: &mut Design,
    powered_led: ComponentId,
    defaults: &ParameterDefaults,
) -> Result<(), DesignError> {
    let led = design.child(powered_led, "led")?;
    let resistor = design.child(powered_led, "current_limiting_resistor")?;

    bind_if_unbound(
        design,
        led,
        ParamKind::ForwardVoltage,
        Parameter::fixed(defaults.led_forward_voltage),
    )?;
    bind_if_unbound(
        design,
        led,
        ParamKind::ForwardCurrent,
        Parameter::fixed(defaults.led_forward_current),
    )?;

    let forward_voltage = fixed_value(design, led, ParamKind::ForwardVoltage)?;
    let forward_current = fixed_value(design, led, ParamKind::ForwardCurrent)?;
    let r = needed_series_resistance(defaults.led_supply_voltage, forward_voltage, forward_current);

    let (low, high) = defaults.led_dimming;
    bind_if_unbound(
        design,
        resistor,
        ParamKind::Resistance,
        Parameter::interval(r * low, r * high)?,
    )
}

fn bind_if_unbound(
    design: &mut Design,
    component: ComponentId,
    kind: ParamKind,
    value: Parameter,
) -> Result<(), DesignError> {
    if design.param(component, kind).is_some() {
        return Ok(());
    }
    design.bind_param(component, kind, value)
}

fn fixed_value(design: &Design, component: ComponentId, kind: ParamKind) -> Result<f64, DesignError> {
    design
        .param(component, kind)
        .and_then(|p| p.value())
        .ok_or_else(|| DesignError::MissingParameter {
            component: design.path(component),
            param: kind,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn powered_led(design: &mut Design) -> (ComponentId, ComponentId, ComponentId) {
        let root = design.root();
        let block = design.add_component(root, "pled", ComponentKind::composite(CompositeKind::PoweredLed));
        let led = design.add_component(block, "led", ComponentKind::Led);
        let r = design.add_component(block, "current_limiting_resistor", ComponentKind::Resistor);
        (block, led, r)
    }

    #[test]
    fn test_series_resistance() {
        assert_eq!(needed_series_resistance(5.0, 2.0, milli(10.0)), 300.0);
    }

    #[test]
    fn test_powered_led_gets_dimmed_range() {
        let mut design = Design::new("b");
        let (_, led, r) = powered_led(&mut design);

        fill_defaults(&mut design, &ParameterDefaults::default()).unwrap();

        assert_eq!(
            design.param(r, ParamKind::Resistance),
            Some(Parameter::interval(600.0, 1200.0).unwrap())
        );
        assert_eq!(design.param(led, ParamKind::ForwardVoltage), Some(Parameter::fixed(2.0)));
        assert_eq!(design.component(led).designator.as_deref(), Some("D"));
    }

    #[test]
    fn test_explicit_values_are_kept() {
        let mut design = Design::new("b");
        let (_, led, r) = powered_led(&mut design);
        design
            .bind_param(led, ParamKind::ForwardVoltage, Parameter::fixed(3.0))
            .unwrap();
        design
            .bind_param(r, ParamKind::Resistance, Parameter::fixed(300.0))
            .unwrap();

        fill_defaults(&mut design, &ParameterDefaults::default()).unwrap();
        assert_eq!(design.param(r, ParamKind::Resistance), Some(Parameter::fixed(300.0)));
        assert_eq!(design.param(led, ParamKind::ForwardVoltage), Some(Parameter::fixed(3.0)));
    }

    #[test]
    fn test_open_forward_voltage_is_an_error() {
        let mut design = Design::new("b");
        let (_, led, _) = powered_led(&mut design);
        design
            .bind_param(led, ParamKind::ForwardVoltage, Parameter::interval(1.8, 2.2).unwrap())
            .unwrap();

        let err = fill_defaults(&mut design, &ParameterDefaults::default()).unwrap_err();
        assert!(matches!(err, DesignError::MissingParameter { .. }));
    }

    #[test]
    fn test_power_switch_pull_resistor() {
        let mut design = Design::new("b");
        let root = design.root();
        let switch = design.add_component(root, "sw", ComponentKind::composite(CompositeKind::PowerSwitch));
        let pull = design.add_component(switch, "pull_resistor", ComponentKind::Resistor);

        fill_defaults(&mut design, &ParameterDefaults::default()).unwrap();
        assert_eq!(
            design.param(pull, ParamKind::Resistance),
            Some(Parameter::fixed(100_000.0))
        );
    }

    #[test]
    fn test_power_switch_without_pull_resistor() {
        let mut design = Design::new("b");
        let root = design.root();
        design.add_component(root, "sw", ComponentKind::composite(CompositeKind::PowerSwitch));
        assert!(matches!(
            fill_defaults(&mut design, &ParameterDefaults::default()),
            Err(DesignError::UnknownComponent { .. })
        ));
    }

    #[test]
    fn test_tbd_capacitor_defaulted_and_reported() {
        let mut design = Design::new("b");
        let root = design.root();
        let tbd = design.add_component(root, "bulk", ComponentKind::Capacitor);
        let set = design.add_component(root, "decoupling", ComponentKind::Capacitor);
        design
            .bind_param(set, ParamKind::Capacitance, Parameter::fixed(nano(10.0)))
            .unwrap();

        let issues = fill_defaults(&mut design, &ParameterDefaults::default()).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].component.as_deref(), Some("b.bulk"));
        assert_eq!(issues[0].severity, Severity::Info);
        assert_eq!(
            design.param(tbd, ParamKind::Capacitance),
            Some(Parameter::fixed(nano(100.0)))
        );
        assert_eq!(
            design.param(set, ParamKind::Capacitance),
            Some(Parameter::fixed(nano(10.0)))
        );
    }

    #[test]
    fn test_defaults_deserialize_partially() {
        let defaults: ParameterDefaults =
            serde_json::from_str(r#"{ "led_supply_voltage": 3.3 }"#).unwrap();
        assert_eq!(defaults.led_supply_voltage, 3.3);
        assert_eq!(defaults.pull_resistance, 100_000.0);
    }
}
