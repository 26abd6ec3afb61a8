//! Reference board: ESP32-C3 retrofit for the IKEA Vindriktning
//!
//! ```text
//!  USB-C PSU (5V) ──┬──▶ ME6211 LDO ──(3V3)──┬──▶ ESP32-C3
//!                   │                        └──▶ PM sensor (3V3 side)
//!                   ├──▶ HLK-LD2410B presence sensor
//!                   ├──▶ WS2812B string
//!                   └──▶ PM sensor (5V side)
//! ```
//!
//! MCU pins: gpio5 LED data, gpio6 presence out, gpio7 fan enable,
//! gpio8/gpio9 PM sensor UART.

pub mod blocks;

use serde::{Deserialize, Serialize};

use crate::graph::{ComponentKind, Design, DesignError, PartKind};

pub const BOARD_NAME: &str = "vindriktning_esp32_c3";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardOptions {
    /// WS2812B pixels in the LED string
    pub pixels: usize,
    /// Drive the LED string through a 5V level buffer
    pub buffered: bool,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            pixels: 5,
            buffered: true,
        }
    }
}

/// Assemble and wire the reference board. Parameters the sub-circuits leave
/// open are filled later by [`crate::defaults::fill_defaults`].
pub fn build_vindriktning(options: &BoardOptions) -> Result<Design, DesignError> {
    let mut design = Design::new(BOARD_NAME);
    let root = design.root();

    let pm_sensor = blocks::pm_sensor(&mut design, root, "pm_sensor")?;
    let leds = blocks::digital_led(&mut design, root, "leds", options.pixels, options.buffered)?;
    let mcu = design.add_component(root, "mcu", ComponentKind::part(PartKind::Esp32C3Mini1));
    let presence = design.add_component(root, "presence_sensor", ComponentKind::part(PartKind::HlkLd2410bP));
    let psu = blocks::usb_c_psu(&mut design, root, "psu")?;
    let ldo = design.add_component(root, "ldo", ComponentKind::part(PartKind::Me6211c33m5gN));

    // Power
    let v3v3 = design.iface(ldo, "power_out")?;
    let v3v3_loads = [design.iface(mcu, "pwr3v3")?, design.iface(pm_sensor, "power_3v3_in")?];
    design.connect_to_all(v3v3, &v3v3_loads)?;

    let v5 = design.iface(psu, "power_out")?;
    let v5_loads = [
        design.iface(ldo, "power_in")?,
        design.iface(presence, "power")?,
        design.iface(leds, "power")?,
        design.iface(pm_sensor, "power_5v_in")?,
    ];
    design.connect_to_all(v5, &v5_loads)?;

    // Sensors
    design.connect(design.iface(presence, "uart")?, design.iface(mcu, "serial")?)?;
    design.connect(design.iface(presence, "out")?, design.iface(mcu, "gpio[6]")?)?;
    design.connect(design.iface(pm_sensor, "uart.rx")?, design.iface(mcu, "gpio[8]")?)?;
    design.connect(design.iface(pm_sensor, "uart.tx")?, design.iface(mcu, "gpio[9]")?)?;
    design.connect(design.iface(pm_sensor, "fan_enable")?, design.iface(mcu, "gpio[7]")?)?;

    // LEDs
    design.connect(design.iface(leds, "data_in")?, design.iface(mcu, "gpio[5]")?)?;

    let stats = design.stats();
    tracing::debug!(
        "Built {}: {} components, {} interfaces, {} links",
        BOARD_NAME,
        stats.component_count,
        stats.interface_count,
        stats.link_count
    );

    Ok(design)
}
