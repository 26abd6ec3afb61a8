//! Reusable sub-circuits
//!
//! Each builder adds one composite under `parent`, creates its children and
//! wires them to the composite's own interfaces. Parameters the block owns
//! are bound here; the rest are left for the defaulting pass.

use crate::graph::{
    ChannelType, ComponentId, ComponentKind, CompositeKind, Design, DesignError, PartKind,
    SaturationType,
};
use crate::parameter::{ParamKind, Parameter};
use crate::units::nano;

/// Low-side N-MOSFET switch with a gate pull-down.
///
/// Bridges `switched_power_out.lv` to `power_in.lv`, so a load pin can be
/// routed to ground through the switch with `connect_via`.
pub fn power_switch(design: &mut Design, parent: ComponentId, name: &str) -> Result<ComponentId, DesignError> {
    let switch = design.add_component(parent, name, ComponentKind::composite(CompositeKind::PowerSwitch));
    let mosfet = design.add_component(
        switch,
        "mosfet",
        ComponentKind::mosfet(ChannelType::NChannel, SaturationType::Enhancement),
    );
    let pull = design.add_component(switch, "pull_resistor", ComponentKind::Resistor);

    let logic = design.iface(switch, "logic_in.signal")?;
    let gnd = design.iface(switch, "power_in.lv")?;
    let switched_lv = design.iface(switch, "switched_power_out.lv")?;

    design.connect(design.iface(mosfet, "gate")?, logic)?;
    design.connect(design.iface(mosfet, "source")?, gnd)?;
    design.connect(design.iface(mosfet, "drain")?, switched_lv)?;

    design.connect(design.iface(pull, "unnamed[0]")?, logic)?;
    design.connect(design.iface(pull, "unnamed[1]")?, gnd)?;

    // High side passes straight through
    let hv_in = design.iface(switch, "power_in.hv")?;
    let hv_out = design.iface(switch, "switched_power_out.hv")?;
    design.connect(hv_in, hv_out)?;

    design.set_bridge(switch, switched_lv, gnd)?;
    Ok(switch)
}

/// LED with a current limiting resistor across a power rail.
pub fn powered_led(design: &mut Design, parent: ComponentId, name: &str) -> Result<ComponentId, DesignError> {
    let block = design.add_component(parent, name, ComponentKind::composite(CompositeKind::PoweredLed));
    let resistor = design.add_component(block, "current_limiting_resistor", ComponentKind::Resistor);
    let led = design.add_component(block, "led", ComponentKind::Led);

    let r_in = design.iface(resistor, "unnamed[0]")?;
    let r_out = design.iface(resistor, "unnamed[1]")?;
    design.set_bridge(resistor, r_in, r_out)?;

    let hv = design.iface(block, "power.hv")?;
    let lv = design.iface(block, "power.lv")?;
    design.connect_via(hv, resistor, design.iface(led, "anode")?)?;
    design.connect(design.iface(led, "cathode")?, lv)?;
    Ok(block)
}

/// Active-high indicator LED switched by a logic signal.
pub fn led_indicator(design: &mut Design, parent: ComponentId, name: &str) -> Result<ComponentId, DesignError> {
    let block = design.add_component(parent, name, ComponentKind::composite(CompositeKind::LedIndicator));
    let led = powered_led(design, block, "led")?;
    let switch = power_switch(design, block, "power_switch")?;

    design.connect(design.iface(block, "logic_in")?, design.iface(switch, "logic_in")?)?;
    design.connect(design.iface(block, "power_in")?, design.iface(switch, "power_in")?)?;
    design.connect(
        design.iface(switch, "switched_power_out")?,
        design.iface(led, "power")?,
    )?;
    Ok(block)
}

/// Single gate 74AHCT buffer, always enabled.
pub fn level_buffer(design: &mut Design, parent: ComponentId, name: &str) -> Result<ComponentId, DesignError> {
    let block = design.add_component(parent, name, ComponentKind::composite(CompositeKind::LevelBuffer));
    let buffer = design.add_component(block, "buffer", ComponentKind::part(PartKind::Pf74ahct2g125));
    let cap = design.add_component(block, "decoupling_cap", ComponentKind::Capacitor);
    design.bind_param(cap, ParamKind::Capacitance, Parameter::fixed(nano(100.0)))?;

    let power = design.iface(block, "power")?;
    design.connect(power, design.iface(buffer, "power")?)?;
    design.decouple(power, cap)?;

    // OE is active low
    design.connect(design.iface(buffer, "oe.signal")?, design.iface(block, "power.lv")?)?;

    let logic_in = design.iface(block, "logic_in")?;
    let logic_out = design.iface(block, "logic_out")?;
    design.connect(logic_in, design.iface(buffer, "a")?)?;
    design.connect(design.iface(buffer, "y")?, logic_out)?;

    design.set_bridge(block, logic_in, logic_out)?;
    Ok(block)
}

/// Daisy-chained WS2812B string, one decoupling capacitor per pixel.
pub fn digital_led(
    design: &mut Design,
    parent: ComponentId,
    name: &str,
    pixels: usize,
    buffered: bool,
) -> Result<ComponentId, DesignError> {
    let block = design.add_component(parent, name, ComponentKind::composite(CompositeKind::DigitalLed));
    let buffer = if buffered {
        Some(level_buffer(design, block, "buffer")?)
    } else {
        None
    };

    let power = design.iface(block, "power")?;
    let mut leds = Vec::with_capacity(pixels);
    for i in 0..pixels {
        let led = design.add_component(
            block,
            format!("leds[{}]", i),
            ComponentKind::part(PartKind::Xl3528RgbwWs2812b),
        );
        let cap = design.add_component(block, format!("decoupling_cap_led[{}]", i), ComponentKind::Capacitor);
        design.bind_param(cap, ParamKind::Capacitance, Parameter::fixed(nano(100.0)))?;

        design.decouple(power, cap)?;
        design.connect(power, design.iface(led, "power")?)?;
        leds.push(led);
    }

    for pair in leds.windows(2) {
        design.connect(design.iface(pair[0], "do")?, design.iface(pair[1], "di")?)?;
    }

    if let Some(&first) = leds.first() {
        let data_in = design.iface(block, "data_in")?;
        let di = design.iface(first, "di")?;
        match buffer {
            Some(buffer) => {
                design.connect(design.iface(buffer, "power")?, power)?;
                design.connect_via(data_in, buffer, di)?;
            }
            None => design.connect(data_in, di)?,
        }
    }

    Ok(block)
}

/// Fan and particulate sensor interface of the air quality monitor.
///
/// The fan is low-side switched and mirrored by an indicator LED; the sensor
/// UART is level shifted in both directions.
pub fn pm_sensor(design: &mut Design, parent: ComponentId, name: &str) -> Result<ComponentId, DesignError> {
    let block = design.add_component(parent, name, ComponentKind::composite(CompositeKind::PmSensor));
    let fan_indicator = led_indicator(design, block, "fan_indicator")?;
    let fan_connector = design.add_component(block, "fan_connector", ComponentKind::part(PartKind::Pf533984002));
    let sensor_connector = design.add_component(
        block,
        "pm_sensor_connector",
        ComponentKind::part(PartKind::B4bZrSm4Tf),
    );
    let fan_switch = power_switch(design, block, "fan_power_switch")?;
    let tx_buffer = level_buffer(design, block, "pm_sensor_buffer[0]")?;
    let rx_buffer = level_buffer(design, block, "pm_sensor_buffer[1]")?;

    let gnd = design.iface(block, "power_5v_in.lv")?;
    let v5 = design.iface(block, "power_5v_in.hv")?;
    let fan_enable = design.iface(block, "fan_enable")?;

    design.connect_via(design.iface(fan_connector, "pin[0]")?, fan_switch, gnd)?;
    design.connect(design.iface(fan_connector, "pin[1]")?, v5)?;
    design.connect(design.iface(fan_switch, "logic_in")?, fan_enable)?;

    design.connect(design.iface(fan_indicator, "logic_in")?, fan_enable)?;
    design.connect(
        design.iface(fan_indicator, "power_in")?,
        design.iface(block, "power_3v3_in")?,
    )?;

    // MCU 3V3 out to sensor 5V in, sensor 5V out to MCU 3V3 in
    design.connect(design.iface(tx_buffer, "power")?, design.iface(block, "power_5v_in")?)?;
    design.connect(design.iface(rx_buffer, "power")?, design.iface(block, "power_3v3_in")?)?;

    design.connect(design.iface(sensor_connector, "pin[3]")?, gnd)?;
    design.connect(design.iface(sensor_connector, "pin[2]")?, v5)?;
    design.connect_via(
        design.iface(sensor_connector, "pin[1]")?,
        rx_buffer,
        design.iface(block, "uart.rx.signal")?,
    )?;
    design.connect_via(
        design.iface(sensor_connector, "pin[0]")?,
        tx_buffer,
        design.iface(block, "uart.tx.signal")?,
    )?;

    Ok(block)
}

/// USB-C sink power input: 5.1k CC pull-downs and a bulk capacitor.
///
/// The bulk capacitance is left unset.
pub fn usb_c_psu(design: &mut Design, parent: ComponentId, name: &str) -> Result<ComponentId, DesignError> {
    let block = design.add_component(parent, name, ComponentKind::composite(CompositeKind::UsbCPsu));
    let usb = design.add_component(block, "usb", ComponentKind::part(PartKind::UsbTypeCReceptacle24Pin));
    let bulk = design.add_component(block, "bulk_cap", ComponentKind::Capacitor);

    let power = design.iface(block, "power_out")?;
    let gnd = design.iface(block, "power_out.lv")?;
    design.connect(design.iface(usb, "vbus")?, power)?;
    design.decouple(power, bulk)?;

    for (i, cc) in ["cc1", "cc2"].iter().enumerate() {
        let resistor = design.add_component(
            block,
            format!("configuration_resistors[{}]", i),
            ComponentKind::Resistor,
        );
        design.bind_param(resistor, ParamKind::Resistance, Parameter::fixed(5100.0))?;
        design.connect(design.iface(usb, cc)?, design.iface(resistor, "unnamed[0]")?)?;
        design.connect(design.iface(resistor, "unnamed[1]")?, gnd)?;
    }

    Ok(block)
}
