//! Circuit Graph Data Types
//!
//! Component kinds are a closed set: every purchasable module, the generic
//! passives, and the logical composites that only group other nodes. Each kind
//! knows its own interface layout, so adding a component creates its pins.

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::parameter::{ParamKind, Parameter};

/// Index of a component in the design arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub(crate) usize);

/// Interfaces are nodes of the connectivity graph.
pub type InterfaceId = NodeIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    NChannel,
    PChannel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaturationType {
    Enhancement,
    Depletion,
}

/// Categorical MOSFET tags matched against the MOSFET table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MosfetTags {
    pub channel: ChannelType,
    pub saturation: SaturationType,
}

impl std::fmt::Display for MosfetTags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let channel = match self.channel {
            ChannelType::NChannel => "N-channel",
            ChannelType::PChannel => "P-channel",
        };
        let saturation = match self.saturation {
            SaturationType::Enhancement => "enhancement",
            SaturationType::Depletion => "depletion",
        };
        write!(f, "{} {}", channel, saturation)
    }
}

/// Specific modules and ICs with a single manufacturer part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartKind {
    #[serde(rename = "esp32_c3_mini_1")]
    Esp32C3Mini1,
    #[serde(rename = "hlk_ld2410b_p")]
    HlkLd2410bP,
    #[serde(rename = "xl_3528rgbw_ws2812b")]
    Xl3528RgbwWs2812b,
    #[serde(rename = "bh1750fvi_tr")]
    Bh1750fviTr,
    #[serde(rename = "74ahct2g125")]
    Pf74ahct2g125,
    #[serde(rename = "533984002")]
    Pf533984002,
    #[serde(rename = "b4b_zr_sm4_tf")]
    B4bZrSm4Tf,
    #[serde(rename = "usb_type_c_receptacle_24_pin")]
    UsbTypeCReceptacle24Pin,
    #[serde(rename = "me6211c33m5g_n")]
    Me6211c33m5gN,
}

impl PartKind {
    pub fn model(&self) -> &'static str {
        match self {
            PartKind::Esp32C3Mini1 => "ESP32-C3-MINI-1",
            PartKind::HlkLd2410bP => "HLK-LD2410B-P",
            PartKind::Xl3528RgbwWs2812b => "XL-3528RGBW-WS2812B",
            PartKind::Bh1750fviTr => "BH1750FVI-TR",
            PartKind::Pf74ahct2g125 => "74AHCT2G125",
            PartKind::Pf533984002 => "533984002",
            PartKind::B4bZrSm4Tf => "B4B-ZR-SM4-TF",
            PartKind::UsbTypeCReceptacle24Pin => "USB-C-Receptacle-24P",
            PartKind::Me6211c33m5gN => "ME6211C33M5G-N",
        }
    }
}

/// Logical groupings that never map to a purchasable part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeKind {
    Board,
    PmSensor,
    LevelBuffer,
    DigitalLed,
    PowerSwitch,
    PoweredLed,
    LedIndicator,
    UsbCPsu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentKind {
    Part { part: PartKind },
    Resistor,
    Capacitor,
    Led,
    Mosfet { tags: MosfetTags },
    Composite { composite: CompositeKind },
}

impl ComponentKind {
    pub fn part(part: PartKind) -> Self {
        ComponentKind::Part { part }
    }

    pub fn mosfet(channel: ChannelType, saturation: SaturationType) -> Self {
        ComponentKind::Mosfet {
            tags: MosfetTags {
                channel,
                saturation,
            },
        }
    }

    pub fn composite(composite: CompositeKind) -> Self {
        ComponentKind::Composite { composite }
    }

    /// Top-level interfaces created together with a component of this kind.
    pub fn interface_layout(&self) -> Vec<(String, InterfaceKind)> {
        use InterfaceKind::*;

        match self {
            ComponentKind::Resistor | ComponentKind::Capacitor => {
                indexed("unnamed", 2, Electrical)
            }
            ComponentKind::Led => named(&[("anode", Electrical), ("cathode", Electrical)]),
            ComponentKind::Mosfet { .. } => named(&[
                ("source", Electrical),
                ("gate", Electrical),
                ("drain", Electrical),
            ]),
            ComponentKind::Part { part } => match part {
                PartKind::Esp32C3Mini1 => {
                    let mut layout = named(&[("pwr3v3", ElectricPower)]);
                    layout.extend(indexed("gpio", 22, ElectricLogic));
                    layout.push(("serial".to_string(), Uart));
                    layout
                }
                PartKind::HlkLd2410bP => named(&[
                    ("power", ElectricPower),
                    ("uart", Uart),
                    ("out", ElectricLogic),
                ]),
                PartKind::Xl3528RgbwWs2812b => named(&[
                    ("power", ElectricPower),
                    ("di", ElectricLogic),
                    ("do", ElectricLogic),
                ]),
                PartKind::Bh1750fviTr => named(&[
                    ("power", ElectricPower),
                    ("sda", ElectricLogic),
                    ("scl", ElectricLogic),
                ]),
                PartKind::Pf74ahct2g125 => named(&[
                    ("power", ElectricPower),
                    ("a", ElectricLogic),
                    ("y", ElectricLogic),
                    ("oe", ElectricLogic),
                ]),
                PartKind::Pf533984002 => indexed("pin", 2, Electrical),
                PartKind::B4bZrSm4Tf => indexed("pin", 4, Electrical),
                PartKind::UsbTypeCReceptacle24Pin => named(&[
                    ("vbus", ElectricPower),
                    ("cc1", Electrical),
                    ("cc2", Electrical),
                ]),
                PartKind::Me6211c33m5gN => {
                    named(&[("power_in", ElectricPower), ("power_out", ElectricPower)])
                }
            },
            ComponentKind::Composite { composite } => match composite {
                CompositeKind::Board => Vec::new(),
                CompositeKind::PmSensor => named(&[
                    ("power_5v_in", ElectricPower),
                    ("power_3v3_in", ElectricPower),
                    ("fan_enable", ElectricLogic),
                    ("uart", Uart),
                ]),
                CompositeKind::LevelBuffer => named(&[
                    ("logic_in", ElectricLogic),
                    ("logic_out", ElectricLogic),
                    ("power", ElectricPower),
                ]),
                CompositeKind::DigitalLed => {
                    named(&[("data_in", ElectricLogic), ("power", ElectricPower)])
                }
                CompositeKind::PowerSwitch => named(&[
                    ("logic_in", ElectricLogic),
                    ("power_in", ElectricPower),
                    ("switched_power_out", ElectricPower),
                ]),
                CompositeKind::PoweredLed => named(&[("power", ElectricPower)]),
                CompositeKind::LedIndicator => {
                    named(&[("logic_in", ElectricLogic), ("power_in", ElectricPower)])
                }
                CompositeKind::UsbCPsu => named(&[("power_out", ElectricPower)]),
            },
        }
    }
}

fn named(names: &[(&str, InterfaceKind)]) -> Vec<(String, InterfaceKind)> {
    names.iter().map(|(n, k)| (n.to_string(), *k)).collect()
}

fn indexed(prefix: &str, count: usize, kind: InterfaceKind) -> Vec<(String, InterfaceKind)> {
    (0..count).map(|i| (format!("{}[{}]", prefix, i), kind)).collect()
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentKind::Part { part } => write!(f, "{}", part.model()),
            ComponentKind::Resistor => write!(f, "Resistor"),
            ComponentKind::Capacitor => write!(f, "Capacitor"),
            ComponentKind::Led => write!(f, "LED"),
            ComponentKind::Mosfet { tags } => write!(f, "MOSFET ({})", tags),
            ComponentKind::Composite { composite } => write!(f, "{:?}", composite),
        }
    }
}

/// Signal type of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceKind {
    /// A single electrical node; the only kind ERC inspects
    Electrical,
    ElectricLogic,
    ElectricPower,
    Uart,
}

impl InterfaceKind {
    /// Named sub-interfaces, connected pairwise when parents connect.
    pub fn children(&self) -> &'static [(&'static str, InterfaceKind)] {
        match self {
            InterfaceKind::Electrical => &[],
            InterfaceKind::ElectricLogic => &[("signal", InterfaceKind::Electrical)],
            InterfaceKind::ElectricPower => &[
                ("hv", InterfaceKind::Electrical),
                ("lv", InterfaceKind::Electrical),
            ],
            InterfaceKind::Uart => &[
                ("rx", InterfaceKind::ElectricLogic),
                ("tx", InterfaceKind::ElectricLogic),
            ],
        }
    }
}

impl std::fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterfaceKind::Electrical => write!(f, "Electrical"),
            InterfaceKind::ElectricLogic => write!(f, "ElectricLogic"),
            InterfaceKind::ElectricPower => write!(f, "ElectricPower"),
            InterfaceKind::Uart => write!(f, "UART"),
        }
    }
}

/// A typed endpoint owned by exactly one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    pub kind: InterfaceKind,
    pub owner: ComponentId,

    /// Enclosing composite interface, `None` for top-level pins
    pub parent: Option<InterfaceId>,

    pub children: Vec<InterfaceId>,
}

/// Edge weight of the connectivity graph: a direct link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Two-port component this link was routed through, if any
    pub bridged_by: Option<ComponentId>,
}

/// A node of the circuit: purchasable part, passive, or logical composite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub kind: ComponentKind,
    pub parent: Option<ComponentId>,
    pub children: Vec<ComponentId>,

    /// Top-level interfaces in layout order
    pub interfaces: Vec<InterfaceId>,

    /// Reference designator prefix ("D", "Q", ...)
    pub designator: Option<String>,

    /// Defined pass-through pair `(input, output)` for `connect_via`
    pub bridge: Option<(InterfaceId, InterfaceId)>,

    pub(crate) params: BTreeMap<ParamKind, Parameter>,
}

impl Component {
    pub(crate) fn new(name: impl Into<String>, kind: ComponentKind, parent: Option<ComponentId>) -> Self {
        Self {
            name: name.into(),
            kind,
            parent,
            children: Vec::new(),
            interfaces: Vec::new(),
            designator: None,
            bridge: None,
            params: BTreeMap::new(),
        }
    }

    /// Current value of a parameter slot; `None` while unbound.
    pub fn param(&self, kind: ParamKind) -> Option<Parameter> {
        self.params.get(&kind).copied()
    }
}
