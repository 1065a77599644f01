//! Kinds of measurement a device can report, with their canonical units.
//!
//! The set is closed: every stored data point carries one of these
//! identifiers in the `device_data.data_type` column.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A measured quantity reported by a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Temperature,
    Humidity,
    Pressure,
    LightIntensity,
    Co2,
    Voltage,
    Current,
    Power,
    Motion,
    DoorStatus,
    WaterLevel,
    Generic,
}

impl DataType {
    /// Every known data type, in display order.
    pub const ALL: [DataType; 12] = [
        DataType::Temperature,
        DataType::Humidity,
        DataType::Pressure,
        DataType::LightIntensity,
        DataType::Co2,
        DataType::Voltage,
        DataType::Current,
        DataType::Power,
        DataType::Motion,
        DataType::DoorStatus,
        DataType::WaterLevel,
        DataType::Generic,
    ];

    /// Wire / column identifier (`"light_intensity"`, `"co2"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Temperature => "temperature",
            DataType::Humidity => "humidity",
            DataType::Pressure => "pressure",
            DataType::LightIntensity => "light_intensity",
            DataType::Co2 => "co2",
            DataType::Voltage => "voltage",
            DataType::Current => "current",
            DataType::Power => "power",
            DataType::Motion => "motion",
            DataType::DoorStatus => "door_status",
            DataType::WaterLevel => "water_level",
            DataType::Generic => "generic",
        }
    }

    /// Human-readable label used in alert messages.
    pub fn label(self) -> &'static str {
        match self {
            DataType::Temperature => "Temperature",
            DataType::Humidity => "Humidity",
            DataType::Pressure => "Pressure",
            DataType::LightIntensity => "Light intensity",
            DataType::Co2 => "CO2 level",
            DataType::Voltage => "Voltage",
            DataType::Current => "Current",
            DataType::Power => "Power",
            DataType::Motion => "Motion detected",
            DataType::DoorStatus => "Door status",
            DataType::WaterLevel => "Water level",
            DataType::Generic => "Generic value",
        }
    }

    /// The unit values of this type are stored in, if the type has one.
    ///
    /// State-like types (motion, door status) and `generic` have no
    /// canonical unit.
    pub fn canonical_unit(self) -> Option<&'static str> {
        match self {
            DataType::Temperature => Some("°C"),
            DataType::Humidity => Some("%"),
            DataType::Pressure => Some("kPa"),
            DataType::LightIntensity => Some("lux"),
            DataType::Co2 => Some("ppm"),
            DataType::Voltage => Some("V"),
            DataType::Current => Some("A"),
            DataType::Power => Some("W"),
            DataType::WaterLevel => Some("cm"),
            DataType::Motion | DataType::DoorStatus | DataType::Generic => None,
        }
    }

    /// Resolve the unit to store for a value of this type.
    ///
    /// A missing unit falls back to the canonical one. A supplied unit must
    /// equal the canonical unit when the type defines one.
    pub fn resolve_unit(self, supplied: Option<&str>) -> Result<Option<String>, CoreError> {
        let supplied = supplied.map(str::trim).filter(|u| !u.is_empty());
        match (self.canonical_unit(), supplied) {
            (Some(canonical), None) => Ok(Some(canonical.to_string())),
            (Some(canonical), Some(unit)) if unit == canonical => Ok(Some(unit.to_string())),
            (Some(canonical), Some(unit)) => Err(CoreError::Validation(format!(
                "unit '{unit}' does not match {} (expected '{canonical}')",
                self.as_str()
            ))),
            (None, unit) => Ok(unit.map(str::to_string)),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown data_type '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_every_identifier() {
        for t in DataType::ALL {
            assert_eq!(t.as_str().parse::<DataType>().unwrap(), t);
        }
    }

    #[test]
    fn rejects_unknown_identifier() {
        assert_matches!("radiation".parse::<DataType>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&DataType::LightIntensity).unwrap();
        assert_eq!(json, "\"light_intensity\"");
        let parsed: DataType = serde_json::from_str("\"door_status\"").unwrap();
        assert_eq!(parsed, DataType::DoorStatus);
    }

    #[test]
    fn pressure_is_stored_in_kpa() {
        assert_eq!(DataType::Pressure.canonical_unit(), Some("kPa"));
    }

    #[test]
    fn missing_unit_defaults_to_canonical() {
        let unit = DataType::Temperature.resolve_unit(None).unwrap();
        assert_eq!(unit.as_deref(), Some("°C"));
    }

    #[test]
    fn mismatched_unit_is_rejected() {
        assert_matches!(
            DataType::Pressure.resolve_unit(Some("hPa")),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn unitless_types_keep_supplied_unit() {
        let unit = DataType::Generic.resolve_unit(Some("rpm")).unwrap();
        assert_eq!(unit.as_deref(), Some("rpm"));
        assert_eq!(DataType::Motion.resolve_unit(None).unwrap(), None);
    }
}
