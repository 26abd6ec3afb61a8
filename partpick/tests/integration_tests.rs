//! End-to-end tests over the reference board

use partpick::board::{build_vindriktning, BoardOptions};
use partpick::catalog::ScalarTable;
use partpick::prelude::*;
use partpick::resolver::PinMap;
use std::io::Write;

fn build() -> (Design, BuildReport) {
    PartPickCore::build_reference_board(&BuildOptions::default()).unwrap()
}

fn part_id<'a>(report: &'a BuildReport, path: &str) -> &'a str {
    report
        .part(path)
        .unwrap_or_else(|| panic!("no part picked for {}", path))
        .part_id
        .as_str()
}

#[test]
fn test_reference_board_resolves() {
    let (_, report) = build();

    assert_eq!(report.design, "vindriktning_esp32_c3");
    assert_eq!(report.catalog, "lcsc");
    assert_eq!(part_id(&report, "vindriktning_esp32_c3.mcu"), "C2934569");
    assert_eq!(part_id(&report, "vindriktning_esp32_c3.presence_sensor"), "C5183132");
    assert_eq!(part_id(&report, "vindriktning_esp32_c3.psu.usb"), "C134092");
    assert_eq!(
        part_id(&report, "vindriktning_esp32_c3.pm_sensor.fan_connector"),
        "C393945"
    );
    assert_eq!(
        part_id(&report, "vindriktning_esp32_c3.pm_sensor.pm_sensor_connector"),
        "C145997"
    );
    assert_eq!(part_id(&report, "vindriktning_esp32_c3.leds.leds[4]"), "C2890364");
    assert_eq!(part_id(&report, "vindriktning_esp32_c3.leds.buffer.buffer"), "C12494");
}

#[test]
fn test_ldo_has_no_catalog_rule() {
    let (_, report) = build();
    assert!(report.part("vindriktning_esp32_c3.ldo").is_none());
}

#[test]
fn test_passives_pick_expected_values() {
    let (design, report) = build();

    let indicator = "vindriktning_esp32_c3.pm_sensor.fan_indicator";
    assert_eq!(
        part_id(&report, &format!("{}.power_switch.pull_resistor", indicator)),
        "C25741"
    );
    assert_eq!(
        part_id(&report, "vindriktning_esp32_c3.pm_sensor.fan_power_switch.pull_resistor"),
        "C25741"
    );
    assert_eq!(
        part_id(&report, "vindriktning_esp32_c3.psu.configuration_resistors[0]"),
        "C226726"
    );
    assert_eq!(part_id(&report, "vindriktning_esp32_c3.psu.bulk_cap"), "C14663");
    assert_eq!(
        part_id(&report, "vindriktning_esp32_c3.leds.decoupling_cap_led[0]"),
        "C14663"
    );

    // 600..1200 ohm narrowed to the first fitting resistor
    let series = report
        .part(&format!("{}.led.current_limiting_resistor", indicator))
        .unwrap();
    assert_eq!(series.part_id, "C11702");
    assert_eq!(
        design.param(series.component, ParamKind::Resistance),
        Some(Parameter::fixed(1000.0))
    );
}

#[test]
fn test_led_and_mosfet_pin_maps() {
    let (_, report) = build();

    let led = report
        .part("vindriktning_esp32_c3.pm_sensor.fan_indicator.led.led")
        .unwrap();
    assert_eq!(led.part_id, "C84256");
    assert_eq!(led.designator.as_deref(), Some("D"));
    let map: &PinMap = led.pin_map.as_ref().unwrap();
    assert_eq!(map.terminal("1"), Some("anode"));
    assert_eq!(map.terminal("2"), Some("cathode"));

    let mosfet = report
        .part("vindriktning_esp32_c3.pm_sensor.fan_power_switch.mosfet")
        .unwrap();
    assert_eq!(mosfet.part_id, "C8545");
    assert_eq!(mosfet.designator.as_deref(), Some("Q"));
    let pins: Vec<(&str, &str)> = mosfet
        .pin_map
        .as_ref()
        .unwrap()
        .pins()
        .iter()
        .map(|p| (p.pin.as_str(), p.terminal.as_str()))
        .collect();
    assert_eq!(pins, vec![("2", "source"), ("3", "drain"), ("1", "gate")]);
}

#[test]
fn test_report_counts() {
    let (_, report) = build();

    // The only informational finding is the bulk capacitor default
    assert_eq!(report.stats.info, 1);
    assert_eq!(report.stats.warnings, 0);
    assert!(!report.has_warnings());
    // One LED and two MOSFETs carry pin maps
    assert_eq!(report.stats.pin_maps, 3);
    assert_eq!(report.stats.picked, report.parts.len());
}

#[test]
fn test_every_scalar_part_is_narrowed() {
    let (design, _) = build();
    for (id, component) in design.components() {
        let kind = match component.kind {
            ComponentKind::Resistor => ScalarTable::Resistors.param(),
            ComponentKind::Capacitor => ScalarTable::Capacitors.param(),
            _ => continue,
        };
        let value = design.param(id, kind).unwrap();
        assert!(value.is_fixed(), "{} still open: {}", design.path(id), value);
    }
}

#[test]
fn test_unbuffered_board_has_one_less_buffer() {
    let buffered = build().1;
    let options = BuildOptions {
        board: BoardOptions {
            pixels: 5,
            buffered: false,
        },
        ..Default::default()
    };
    let (_, unbuffered) = PartPickCore::build_reference_board(&options).unwrap();

    let count = |r: &BuildReport| r.parts.iter().filter(|p| p.part_id == "C12494").count();
    assert_eq!(count(&buffered), 3);
    assert_eq!(count(&unbuffered), 2);
}

#[test]
fn test_external_catalog_without_resistors_fails() {
    let json = r#"{
        "source": "empty",
        "canonical": [],
        "led": null,
        "resistors": [],
        "capacitors": [],
        "mosfets": []
    }"#;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let options = BuildOptions {
        catalog_path: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let err = PartPickCore::build_reference_board(&options).unwrap_err();
    assert!(matches!(err, PartPickError::Resolve(_)));
}

#[test]
fn test_opening_a_pin_is_reported() {
    let mut design = build_vindriktning(&BoardOptions::default()).unwrap();
    let root = design.root();
    design.add_component(root, "spare", ComponentKind::Resistor);

    let catalog = partpick::builtin_catalog().unwrap();
    let defaults = partpick::ParameterDefaults::default();
    let spare = design.child(root, "spare").unwrap();
    design
        .bind_param(spare, ParamKind::Resistance, Parameter::fixed(300.0))
        .unwrap();

    let (_, report) = PartPickCore::finish(design, &catalog, &defaults).unwrap();
    assert_eq!(report.stats.warnings, 2);
    assert!(report
        .issues
        .iter()
        .any(|i| i.interface.as_deref() == Some("vindriktning_esp32_c3.spare.unnamed[1]")));
}
