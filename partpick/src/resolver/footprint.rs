//! Footprint attachment
//!
//! Pin-role maps live in a side table keyed by component, filled by the
//! picker and read when the resolved part is assembled.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::graph::{ComponentId, Design, DesignError, InterfaceId};

pub const LED_PINS: [(&str, &str); 2] = [("1", "anode"), ("2", "cathode")];
pub const MOSFET_PINS: [(&str, &str); 3] = [("2", "source"), ("3", "drain"), ("1", "gate")];

/// Footprint pin number to named terminal, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinMap {
    pins: Vec<PinRole>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRole {
    pub pin: String,
    pub terminal: String,
    pub interface: InterfaceId,
}

impl PinMap {
    /// Build a map from `(pin, terminal interface name)` pairs.
    pub fn from_terminals(
        design: &Design,
        component: ComponentId,
        terminals: &[(&str, &str)],
    ) -> Result<Self, DesignError> {
        let pins = terminals
            .iter()
            .map(|(pin, terminal)| {
                Ok(PinRole {
                    pin: pin.to_string(),
                    terminal: terminal.to_string(),
                    interface: design.iface(component, terminal)?,
                })
            })
            .collect::<Result<Vec<_>, DesignError>>()?;
        Ok(Self { pins })
    }

    pub fn pins(&self) -> &[PinRole] {
        &self.pins
    }

    pub fn terminal(&self, pin: &str) -> Option<&str> {
        self.pins
            .iter()
            .find(|p| p.pin == pin)
            .map(|p| p.terminal.as_str())
    }
}

/// Side table of pin maps attached during resolution.
#[derive(Debug, Clone, Default)]
pub struct PinMaps {
    maps: HashMap<ComponentId, PinMap>,
}

impl PinMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, component: ComponentId, map: PinMap) {
        self.maps.insert(component, map);
    }

    pub fn get(&self, component: ComponentId) -> Option<&PinMap> {
        self.maps.get(&component)
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

/// Outcome of resolving one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPart {
    pub component: ComponentId,
    pub path: String,
    pub kind: String,
    pub part_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_map: Option<PinMap>,
}

/// Associate a chosen part with its component and any attached pin map.
pub fn attach_footprint(
    design: &Design,
    component: ComponentId,
    part_id: String,
    pin_maps: &PinMaps,
) -> ResolvedPart {
    let c = design.component(component);
    ResolvedPart {
        component,
        path: design.path(component),
        kind: c.kind.to_string(),
        part_id,
        designator: c.designator.clone(),
        pin_map: pin_maps.get(component).cloned(),
    }
}
