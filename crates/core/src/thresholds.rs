//! Threshold evaluation for device data points.
//!
//! Pure logic. The configuration is built once at startup and shared
//! read-only; evaluation never mutates it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::alert::{AlertDecision, Breach, Deviation, ThresholdBound};
use crate::data_type::DataType;
use crate::error::CoreError;

/// Acceptable `[min, max]` range for one data type. Either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThresholdRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl ThresholdRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Check a value against the range. Values equal to a bound are in range.
    pub fn check(&self, value: f64) -> AlertDecision {
        if let Some(min) = self.min {
            if value < min {
                return AlertDecision::Triggered(Breach {
                    direction: Deviation::Below,
                    bound: ThresholdBound::Min,
                    threshold: min,
                });
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return AlertDecision::Triggered(Breach {
                    direction: Deviation::Above,
                    bound: ThresholdBound::Max,
                    threshold: max,
                });
            }
        }
        AlertDecision::NotTriggered
    }

    fn validate(&self, data_type: DataType) -> Result<(), CoreError> {
        for (name, bound) in [("min", self.min), ("max", self.max)] {
            if bound.is_some_and(|b| !b.is_finite()) {
                return Err(CoreError::Config(format!(
                    "{data_type} threshold {name} must be a finite number"
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(CoreError::Config(format!(
                    "{data_type} threshold min ({min}) is greater than max ({max})"
                )));
            }
        }
        Ok(())
    }
}

/// Per-data-type threshold ranges.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThresholdConfig {
    ranges: HashMap<DataType, ThresholdRange>,
}

impl ThresholdConfig {
    /// A configuration with no ranges: nothing ever alerts.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in defaults: temperature 5–35 °C, humidity 30–70 %, pressure 95–105 kPa.
    pub fn defaults() -> Self {
        Self::empty()
            .with_range(DataType::Temperature, ThresholdRange::new(Some(5.0), Some(35.0)))
            .with_range(DataType::Humidity, ThresholdRange::new(Some(30.0), Some(70.0)))
            .with_range(DataType::Pressure, ThresholdRange::new(Some(95.0), Some(105.0)))
    }

    /// Add or replace the range for a data type.
    pub fn with_range(mut self, data_type: DataType, range: ThresholdRange) -> Self {
        self.ranges.insert(data_type, range);
        self
    }

    /// Parse a JSON object keyed by data type, e.g.
    /// `{"temperature": {"min": 5, "max": 35}, "co2": {"max": 1000}}`.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let raw: HashMap<String, ThresholdRange> = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("invalid threshold JSON: {e}")))?;

        let mut ranges = HashMap::with_capacity(raw.len());
        for (key, range) in raw {
            let data_type: DataType = key
                .parse()
                .map_err(|_| CoreError::Config(format!("unknown data type '{key}' in thresholds")))?;
            range.validate(data_type)?;
            ranges.insert(data_type, range);
        }
        Ok(Self { ranges })
    }

    pub fn range_for(&self, data_type: DataType) -> Option<&ThresholdRange> {
        self.ranges.get(&data_type)
    }

    /// Configured ranges in [`DataType::ALL`] order.
    pub fn entries(&self) -> Vec<(DataType, ThresholdRange)> {
        DataType::ALL
            .into_iter()
            .filter_map(|t| self.ranges.get(&t).map(|r| (t, *r)))
            .collect()
    }

    /// Decide whether `value` of `data_type` should raise an alert.
    ///
    /// A data type without a configured range never alerts.
    pub fn evaluate(&self, data_type: DataType, value: f64) -> AlertDecision {
        match self.ranges.get(&data_type) {
            Some(range) => range.check(value),
            None => AlertDecision::NotTriggered,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn temperature_above_max_triggers() {
        let config = ThresholdConfig::defaults();
        let decision = config.evaluate(DataType::Temperature, 40.0);
        assert_eq!(
            decision,
            AlertDecision::Triggered(Breach {
                direction: Deviation::Above,
                bound: ThresholdBound::Max,
                threshold: 35.0,
            })
        );
    }

    #[test]
    fn humidity_in_range_does_not_trigger() {
        let config = ThresholdConfig::defaults();
        assert_eq!(
            config.evaluate(DataType::Humidity, 50.0),
            AlertDecision::NotTriggered
        );
    }

    #[test]
    fn unconfigured_type_does_not_trigger() {
        let config = ThresholdConfig::defaults();
        assert!(!config.evaluate(DataType::Co2, 500.0).is_triggered());
    }

    #[test]
    fn below_min_reports_min_bound() {
        let config = ThresholdConfig::defaults();
        let decision = config.evaluate(DataType::Pressure, 80.0);
        let breach = decision.breach().expect("should trigger");
        assert_eq!(breach.direction, Deviation::Below);
        assert_eq!(breach.bound, ThresholdBound::Min);
        assert_eq!(breach.threshold, 95.0);
    }

    #[test]
    fn bounds_are_inclusive() {
        let config = ThresholdConfig::defaults();
        assert!(!config.evaluate(DataType::Temperature, 5.0).is_triggered());
        assert!(!config.evaluate(DataType::Temperature, 35.0).is_triggered());
    }

    #[test]
    fn nan_never_triggers() {
        let config = ThresholdConfig::defaults();
        assert!(!config.evaluate(DataType::Temperature, f64::NAN).is_triggered());
    }

    #[test]
    fn open_ended_range_checks_one_side() {
        let range = ThresholdRange::new(None, Some(1000.0));
        assert!(!range.check(-50.0).is_triggered());
        assert!(range.check(1200.0).is_triggered());
    }

    #[test]
    fn parses_json_configuration() {
        let config =
            ThresholdConfig::from_json(r#"{"co2": {"min": 300, "max": 1000}, "voltage": {"min": 11.5}}"#)
                .unwrap();
        assert!(config.evaluate(DataType::Co2, 1500.0).is_triggered());
        assert!(config.evaluate(DataType::Voltage, 10.0).is_triggered());
        // Replaces the defaults entirely.
        assert!(config.range_for(DataType::Temperature).is_none());
    }

    #[test]
    fn rejects_unknown_type_key() {
        assert_matches!(
            ThresholdConfig::from_json(r#"{"radiation": {"max": 1}}"#),
            Err(CoreError::Config(_))
        );
    }

    #[test]
    fn rejects_inverted_range() {
        assert_matches!(
            ThresholdConfig::from_json(r#"{"humidity": {"min": 80, "max": 20}}"#),
            Err(CoreError::Config(_))
        );
    }

    #[test]
    fn rejects_malformed_json() {
        assert_matches!(ThresholdConfig::from_json("not json"), Err(CoreError::Config(_)));
    }

    #[test]
    fn entries_follow_data_type_order() {
        let types: Vec<DataType> = ThresholdConfig::defaults()
            .entries()
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert_eq!(
            types,
            vec![DataType::Temperature, DataType::Humidity, DataType::Pressure]
        );
    }
}
