//! Metric prefixes and SI value rendering.
//!
//! Physical quantities are plain `f64` values in SI base units, scaled at
//! construction time. Catalog values are written in the same base unit and
//! matched without tolerance, so the scaling must land on the same double a
//! catalog literal parses to. Multiples multiply by an exact power of ten;
//! sub-unit prefixes divide by one (`nano(100.0)` is the double `100e-9`,
//! whereas `100.0 * 1e-9` is not).

pub const K: f64 = 1e3;
pub const MEG: f64 = 1e6;

pub fn milli(value: f64) -> f64 {
    value / 1e3
}

pub fn micro(value: f64) -> f64 {
    value / 1e6
}

pub fn nano(value: f64) -> f64 {
    value / 1e9
}

pub fn pico(value: f64) -> f64 {
    value / 1e12
}

const PREFIXES: [(i32, &str); 7] = [
    (6, "M"),
    (3, "k"),
    (0, ""),
    (-3, "m"),
    (-6, "µ"),
    (-9, "n"),
    (-12, "p"),
];

/// Render a value with the largest prefix that keeps the mantissa >= 1.
pub fn format_si(value: f64, unit: &str) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{}{}", value, unit);
    }

    let magnitude = value.abs();
    let (exp, prefix) = PREFIXES
        .iter()
        .copied()
        .find(|(exp, _)| magnitude >= scale(*exp) * (1.0 - 1e-9))
        .unwrap_or((-12, "p"));

    let mantissa = if exp >= 0 {
        value / 10f64.powi(exp)
    } else {
        value * 10f64.powi(-exp)
    };
    // Trim float noise such as 5.1000000000000005
    let rounded = (mantissa * 1e6).round() / 1e6;
    format!("{}{}{}", rounded, prefix, unit)
}

fn scale(exp: i32) -> f64 {
    if exp >= 0 {
        10f64.powi(exp)
    } else {
        1.0 / 10f64.powi(-exp)
    }
}
