//! Device registry entity model and DTOs.

use fleetwatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A device row from the `devices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Device {
    pub id: DbId,
    /// Hardware identifier, e.g. `ESP32_LivingRoom_Sensor1`.
    pub device_id: String,
    pub name: String,
    pub location: Option<String>,
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
    pub is_active: bool,
    /// Last time the device sent data.
    pub last_seen: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a new device.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDevice {
    pub device_id: String,
    pub name: String,
    pub location: Option<String>,
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
}
