//! Pick Rules
//!
//! The rule list is evaluated front to back and the first rule that claims a
//! component kind decides how it is resolved. Later rules are never consulted
//! for that component.

use crate::catalog::ScalarTable;
use crate::graph::{ComponentKind, MosfetTags, PartKind};

/// One entry of the ordered dispatch list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickRule {
    /// Fixed module with a single catalog identifier
    Canonical { part: PartKind },
    Resistor,
    Led,
    Mosfet,
    Capacitor,
}

/// How a claimed component is matched against the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    Canonical(PartKind),
    /// Scan a scalar table against the component's parameter slot
    Scalar(ScalarTable),
    /// Attach the LED pin map, then return the LED part
    PinMappedLed,
    /// Attach the MOSFET pin map, then match tags exactly
    Categorical(MosfetTags),
}

/// Dispatch order.
///
/// The USB-C receptacle appears once: the second receptacle identifier
/// (`C138392`) could never be reached behind an identical check.
pub const PICK_ORDER: [PickRule; 12] = [
    PickRule::Canonical { part: PartKind::Esp32C3Mini1 },
    PickRule::Canonical { part: PartKind::HlkLd2410bP },
    PickRule::Canonical { part: PartKind::Xl3528RgbwWs2812b },
    PickRule::Canonical { part: PartKind::Bh1750fviTr },
    PickRule::Canonical { part: PartKind::Pf74ahct2g125 },
    PickRule::Canonical { part: PartKind::Pf533984002 },
    PickRule::Canonical { part: PartKind::B4bZrSm4Tf },
    PickRule::Canonical { part: PartKind::UsbTypeCReceptacle24Pin },
    PickRule::Resistor,
    PickRule::Led,
    PickRule::Mosfet,
    PickRule::Capacitor,
];

impl PickRule {
    /// The strategy for `kind` if this rule claims it.
    pub fn select(&self, kind: &ComponentKind) -> Option<Strategy> {
        match (self, kind) {
            (PickRule::Canonical { part }, ComponentKind::Part { part: actual }) if part == actual => {
                Some(Strategy::Canonical(*part))
            }
            (PickRule::Resistor, ComponentKind::Resistor) => {
                Some(Strategy::Scalar(ScalarTable::Resistors))
            }
            (PickRule::Led, ComponentKind::Led) => Some(Strategy::PinMappedLed),
            (PickRule::Mosfet, ComponentKind::Mosfet { tags }) => Some(Strategy::Categorical(*tags)),
            (PickRule::Capacitor, ComponentKind::Capacitor) => {
                Some(Strategy::Scalar(ScalarTable::Capacitors))
            }
            _ => None,
        }
    }
}

/// First rule in [`PICK_ORDER`] that claims `kind`.
pub fn select_strategy(kind: &ComponentKind) -> Option<(PickRule, Strategy)> {
    PICK_ORDER
        .iter()
        .find_map(|rule| rule.select(kind).map(|strategy| (*rule, strategy)))
}
