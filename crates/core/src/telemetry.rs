//! Telemetry values flowing through ingestion: raw samples and typed data points.

use serde::{Deserialize, Serialize};

use crate::conversion::{convert_pressure, convert_temperature, convert_voltage, TemperatureStrategy};
use crate::data_type::DataType;
use crate::error::CoreError;
use crate::types::Timestamp;

/// Uncalibrated readings reported by a receptor, plus the prefix that
/// identifies the sensor hardware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub prefix: String,
    pub raw_pressure: Option<f64>,
    pub raw_temperature: Option<f64>,
    pub raw_voltage: Option<f64>,
}

impl RawSample {
    /// Pressure in kPa, `None` when the prefix is unknown, no reading was
    /// sent, or the formula overflows.
    pub fn pressure_kpa(&self) -> Option<f64> {
        convert_pressure(&self.prefix, self.raw_pressure).filter(|v| v.is_finite())
    }

    pub fn temperature_celsius(&self, strategy: TemperatureStrategy) -> Option<f64> {
        convert_temperature(strategy, self.raw_temperature).filter(|v| v.is_finite())
    }

    pub fn voltage_volts(&self) -> Option<f64> {
        convert_voltage(self.raw_voltage).filter(|v| v.is_finite())
    }

    /// Whether the sample carries no raw channel at all.
    pub fn is_empty(&self) -> bool {
        self.raw_pressure.is_none() && self.raw_temperature.is_none() && self.raw_voltage.is_none()
    }

    /// Expand the sample into one data point per channel that converts.
    ///
    /// Order is pressure, temperature, voltage. Channels that do not convert,
    /// or convert to a non-finite value, are skipped.
    pub fn to_data_points(
        &self,
        strategy: TemperatureStrategy,
        timestamp: Timestamp,
    ) -> Vec<DataPoint> {
        [
            (DataType::Pressure, self.pressure_kpa()),
            (DataType::Temperature, self.temperature_celsius(strategy)),
            (DataType::Voltage, self.voltage_volts()),
        ]
        .into_iter()
        .filter_map(|(data_type, value)| {
            value.map(|v| DataPoint::converted(data_type, v, timestamp))
        })
        .collect()
    }
}

/// A typed measurement in its canonical unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub data_type: DataType,
    pub value: f64,
    pub unit: Option<String>,
    pub timestamp: Timestamp,
}

impl DataPoint {
    /// Build a data point from an already-converted value.
    ///
    /// The unit is checked against the type's canonical unit (see
    /// [`DataType::resolve_unit`]) and non-finite values are rejected.
    pub fn new(
        data_type: DataType,
        value: f64,
        unit: Option<&str>,
        timestamp: Timestamp,
    ) -> Result<Self, CoreError> {
        if !value.is_finite() {
            return Err(CoreError::Validation(format!(
                "data_value for {data_type} must be a finite number"
            )));
        }
        Ok(Self {
            data_type,
            value,
            unit: data_type.resolve_unit(unit)?,
            timestamp,
        })
    }

    fn converted(data_type: DataType, value: f64, timestamp: Timestamp) -> Self {
        Self {
            data_type,
            value,
            unit: data_type.canonical_unit().map(str::to_string),
            timestamp,
        }
    }

    /// Unit for display, empty when the type is unitless.
    pub fn unit_display(&self) -> &str {
        self.unit.as_deref().unwrap_or("")
    }
}
