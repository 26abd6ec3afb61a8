//! Physical Parameters
//!
//! A [`Parameter`] is either a determined quantity ([`Parameter::Fixed`]) or an
//! inclusive range that is still open ([`Parameter::Interval`] over checked
//! [`Bounds`]). Parameters are plain `Copy` values: narrowing never mutates,
//! it returns the new state and the owner stores it back into its slot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::format_si;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("cannot narrow {from} to {to}")]
    InvalidNarrowing { from: Parameter, to: f64 },

    #[error("invalid interval [{min}, {max}]")]
    InvalidInterval { min: f64, max: f64 },
}

/// A value or constraint on a physical quantity, in SI base units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Parameter {
    Fixed { value: f64 },
    Interval(Bounds),
}

/// Inclusive bounds of an open parameter, always finite with `min <= max`.
///
/// Only [`Parameter::interval`] and deserialization build one, and both
/// check the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds")]
pub struct Bounds {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
struct RawBounds {
    min: f64,
    max: f64,
}

impl TryFrom<RawBounds> for Bounds {
    type Error = ParameterError;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        Bounds::new(raw.min, raw.max)
    }
}

impl Bounds {
    fn new(min: f64, max: f64) -> Result<Self, ParameterError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ParameterError::InvalidInterval { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl Parameter {
    pub fn fixed(value: f64) -> Self {
        Parameter::Fixed { value }
    }

    /// Build an inclusive interval; rejects `min > max` and non-finite bounds.
    pub fn interval(min: f64, max: f64) -> Result<Self, ParameterError> {
        Bounds::new(min, max).map(Parameter::Interval)
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Parameter::Fixed { .. })
    }

    /// The determined value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Parameter::Fixed { value } => Some(*value),
            Parameter::Interval(_) => None,
        }
    }

    /// Exact equality for `Fixed`, inclusive containment for `Interval`.
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            Parameter::Fixed { value: fixed } => fixed == value,
            Parameter::Interval(bounds) => bounds.contains(value),
        }
    }

    /// Transition to `Fixed(value)`.
    ///
    /// Narrowing a `Fixed` parameter to its own value is accepted and returns
    /// it unchanged, so an already-narrowed slot can never move again.
    pub fn narrow_to(&self, value: f64) -> Result<Parameter, ParameterError> {
        if !self.contains(value) {
            return Err(ParameterError::InvalidNarrowing {
                from: *self,
                to: value,
            });
        }
        Ok(Parameter::fixed(value))
    }

    pub fn display(&self, unit: &str) -> String {
        match *self {
            Parameter::Fixed { value } => format_si(value, unit),
            Parameter::Interval(bounds) => {
                format!("[{}, {}]", format_si(bounds.min, unit), format_si(bounds.max, unit))
            }
        }
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Parameter::Fixed { value } => write!(f, "Fixed({})", value),
            Parameter::Interval(bounds) => write!(f, "Interval({}, {})", bounds.min, bounds.max),
        }
    }
}

/// Which physical quantity a parameter slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Resistance,
    Capacitance,
    ForwardVoltage,
    ForwardCurrent,
}

impl ParamKind {
    pub fn unit(&self) -> &'static str {
        match self {
            ParamKind::Resistance => "Ω",
            ParamKind::Capacitance => "F",
            ParamKind::ForwardVoltage => "V",
            ParamKind::ForwardCurrent => "A",
        }
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamKind::Resistance => write!(f, "resistance"),
            ParamKind::Capacitance => write!(f, "capacitance"),
            ParamKind::ForwardVoltage => write!(f, "forward voltage"),
            ParamKind::ForwardCurrent => write!(f, "forward current"),
        }
    }
}
