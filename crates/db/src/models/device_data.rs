//! Device data point model and DTOs.
//!
//! One row per measured value. Rows produced from a raw receptor sample
//! also carry the raw channels and the formula prefix.

use fleetwatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `device_data` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeviceData {
    pub id: DbId,
    pub device_id: DbId,
    pub data_type: String,
    pub data_value: f64,
    pub unit: Option<String>,
    pub prefix: Option<String>,
    pub raw_pressure: Option<f64>,
    pub raw_temperature: Option<f64>,
    pub raw_voltage: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub course: Option<f64>,
    pub satellites: Option<i32>,
    pub timestamp: Timestamp,
    pub created_at: Timestamp,
}

/// GPS fix attached to a reading.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GpsFix {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub course: Option<f64>,
    pub satellites: Option<i32>,
}

/// DTO for inserting a data point.
#[derive(Debug, Clone)]
pub struct CreateDeviceData {
    pub device_id: DbId,
    pub data_type: String,
    pub data_value: f64,
    pub unit: Option<String>,
    pub prefix: Option<String>,
    pub raw_pressure: Option<f64>,
    pub raw_temperature: Option<f64>,
    pub raw_voltage: Option<f64>,
    pub gps: GpsFix,
    pub timestamp: Timestamp,
}

/// Filters for listing data points.
#[derive(Debug, Clone, Default)]
pub struct DeviceDataFilter {
    pub device_id: Option<DbId>,
    pub data_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
