//! Raw sensor count to physical unit conversion.
//!
//! Pure functions; nothing here touches the database. A receptor prefix
//! selects one of the known linear pressure formulas. Anything that does not
//! resolve to a formula, or a missing raw value, yields `None` rather than
//! an error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Receptor prefix for the `2.8 * psi + 87.20` formula.
pub const PREFIX_RPS_A: &str = "RPS_A";
/// Receptor prefix for the `1.572 * psi + 98.428` formula.
pub const PREFIX_RPS_B: &str = "RPS_B";
/// Receptor prefix for the `0.688 * psi + 99.312` formula.
pub const PREFIX_RPS_C: &str = "RPS_C";

/// Offset subtracted from raw temperature counts by [`TemperatureStrategy::Offset55`].
const TEMPERATURE_OFFSET: f64 = 55.0;

// ---------------------------------------------------------------------------
// Pressure
// ---------------------------------------------------------------------------

/// Linear pressure formula selected by receptor prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureFormula {
    /// `kPa = 2.8 * psi + 87.20`
    RpsA,
    /// `kPa = 1.572 * psi + 98.428`
    RpsB,
    /// `kPa = 0.688 * psi + 99.312`
    RpsC,
    /// Prefix did not match any known hardware.
    Unknown,
}

impl PressureFormula {
    /// Select the formula for a receptor prefix.
    ///
    /// Receptor identifiers carry the hardware code as their leading segment
    /// (e.g. `RPS_A-0042`), so the match is on the start of the string.
    pub fn from_prefix(prefix: &str) -> Self {
        let prefix = prefix.trim();
        if prefix.starts_with(PREFIX_RPS_A) {
            PressureFormula::RpsA
        } else if prefix.starts_with(PREFIX_RPS_B) {
            PressureFormula::RpsB
        } else if prefix.starts_with(PREFIX_RPS_C) {
            PressureFormula::RpsC
        } else {
            PressureFormula::Unknown
        }
    }

    /// `(slope, intercept)` of the formula, `None` for [`PressureFormula::Unknown`].
    fn coefficients(self) -> Option<(f64, f64)> {
        match self {
            PressureFormula::RpsA => Some((2.8, 87.20)),
            PressureFormula::RpsB => Some((1.572, 98.428)),
            PressureFormula::RpsC => Some((0.688, 99.312)),
            PressureFormula::Unknown => None,
        }
    }

    /// Apply the formula to a raw psi reading.
    pub fn apply(self, raw_psi: f64) -> Option<f64> {
        self.coefficients()
            .map(|(slope, intercept)| slope * raw_psi + intercept)
    }
}

/// Convert a raw psi reading to kPa using the formula for `prefix`.
///
/// Returns `None` for an unknown prefix or a missing reading.
pub fn convert_pressure(prefix: &str, raw_psi: Option<f64>) -> Option<f64> {
    raw_psi.and_then(|psi| PressureFormula::from_prefix(prefix).apply(psi))
}

// ---------------------------------------------------------------------------
// Temperature
// ---------------------------------------------------------------------------

/// How raw temperature counts become degrees Celsius.
///
/// Sensor firmware revisions disagree here, so the rule is chosen once per
/// deployment instead of being guessed per reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureStrategy {
    /// `°C = raw - 55`
    #[default]
    Offset55,
    /// Raw value is already in °C.
    Celsius,
}

impl TemperatureStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            TemperatureStrategy::Offset55 => "offset55",
            TemperatureStrategy::Celsius => "celsius",
        }
    }

    pub fn apply(self, raw: f64) -> f64 {
        match self {
            TemperatureStrategy::Offset55 => raw - TEMPERATURE_OFFSET,
            TemperatureStrategy::Celsius => raw,
        }
    }
}

impl fmt::Display for TemperatureStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offset55" => Ok(TemperatureStrategy::Offset55),
            "celsius" => Ok(TemperatureStrategy::Celsius),
            other => Err(CoreError::Config(format!(
                "unknown temperature strategy '{other}' (expected 'offset55' or 'celsius')"
            ))),
        }
    }
}

/// Convert a raw temperature reading to °C.
pub fn convert_temperature(strategy: TemperatureStrategy, raw: Option<f64>) -> Option<f64> {
    raw.map(|t| strategy.apply(t))
}

// ---------------------------------------------------------------------------
// Voltage
// ---------------------------------------------------------------------------

/// Raw voltage is reported in volts already.
pub fn convert_voltage(raw: Option<f64>) -> Option<f64> {
    raw
}
