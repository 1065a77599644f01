//! Query parameter types for API handlers.

use fleetwatch_core::types::DbId;
use serde::Deserialize;

/// Query parameters for `GET /device-data`.
///
/// `limit` / `offset` are clamped in the repository layer via
/// `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct DeviceDataQuery {
    pub device_id: Option<DbId>,
    pub data_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
