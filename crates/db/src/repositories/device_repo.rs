//! Repository for the `devices` table.

use fleetwatch_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::device::{CreateDevice, Device};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, device_id, name, location, ip_address, mac_address, \
    is_active, last_seen, created_at, updated_at";

/// Provides query operations for the device registry.
pub struct DeviceRepo;

impl DeviceRepo {
    /// Register a new device, returning the created row.
    ///
    /// If `is_active` is `None` in the input, defaults to `true`.
    pub async fn create(pool: &PgPool, input: &CreateDevice) -> Result<Device, sqlx::Error> {
        let query = format!(
            "INSERT INTO devices (device_id, name, location, ip_address, mac_address, is_active)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(&input.device_id)
            .bind(&input.name)
            .bind(&input.location)
            .bind(&input.ip_address)
            .bind(&input.mac_address)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Device>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devices WHERE id = $1");
        sqlx::query_as::<_, Device>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all devices ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Device>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devices ORDER BY name, id");
        sqlx::query_as::<_, Device>(&query).fetch_all(pool).await
    }

    /// Record that the device reported data at `seen_at`.
    ///
    /// `last_seen` only moves forward. Returns `true` if the device exists.
    pub async fn touch_last_seen(
        pool: &PgPool,
        id: DbId,
        seen_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE devices
             SET last_seen = GREATEST(COALESCE(last_seen, $2), $2), updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(seen_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
