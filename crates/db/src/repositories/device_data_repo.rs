//! Repository for the `device_data` table (append-only time-series).

use fleetwatch_core::paging::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use fleetwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::device_data::{CreateDeviceData, DeviceData, DeviceDataFilter};

/// Column list for `device_data` SELECT queries.
const COLUMNS: &str = "\
    id, device_id, data_type, data_value, unit, \
    prefix, raw_pressure, raw_temperature, raw_voltage, \
    latitude, longitude, altitude, speed, course, satellites, \
    timestamp, created_at";

/// Column list for INSERT statements (excludes generated `id` and `created_at`).
const INSERT_COLUMNS: &str = "\
    device_id, data_type, data_value, unit, \
    prefix, raw_pressure, raw_temperature, raw_voltage, \
    latitude, longitude, altitude, speed, course, satellites, \
    timestamp";

/// Provides query operations for device data points.
pub struct DeviceDataRepo;

impl DeviceDataRepo {
    /// Insert a single data point.
    pub async fn create(pool: &PgPool, input: &CreateDeviceData) -> Result<DeviceData, sqlx::Error> {
        let query = insert_query();
        bind_insert(sqlx::query_as::<_, DeviceData>(&query), input)
            .fetch_one(pool)
            .await
    }

    /// Insert several data points in one transaction.
    ///
    /// Either every row is stored or none is. Rows are returned in input order.
    pub async fn create_batch(
        pool: &PgPool,
        inputs: &[CreateDeviceData],
    ) -> Result<Vec<DeviceData>, sqlx::Error> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let query = insert_query();
        let mut tx = pool.begin().await?;
        let mut rows = Vec::with_capacity(inputs.len());
        for input in inputs {
            let row = bind_insert(sqlx::query_as::<_, DeviceData>(&query), input)
                .fetch_one(&mut *tx)
                .await?;
            rows.push(row);
        }
        tx.commit().await?;
        Ok(rows)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DeviceData>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM device_data WHERE id = $1");
        sqlx::query_as::<_, DeviceData>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List data points newest first, optionally filtered by device and type.
    pub async fn list(
        pool: &PgPool,
        filter: &DeviceDataFilter,
    ) -> Result<Vec<DeviceData>, sqlx::Error> {
        let limit = clamp_limit(filter.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(filter.offset);

        let query = format!(
            "SELECT {COLUMNS} FROM device_data \
             WHERE ($1::BIGINT IS NULL OR device_id = $1) \
               AND ($2::TEXT IS NULL OR data_type = $2) \
             ORDER BY timestamp DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, DeviceData>(&query)
            .bind(filter.device_id)
            .bind(&filter.data_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}

fn insert_query() -> String {
    format!(
        "INSERT INTO device_data ({INSERT_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
         RETURNING {COLUMNS}"
    )
}

fn bind_insert<'q>(
    query: sqlx::query::QueryAs<'q, sqlx::Postgres, DeviceData, sqlx::postgres::PgArguments>,
    input: &'q CreateDeviceData,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, DeviceData, sqlx::postgres::PgArguments> {
    query
        .bind(input.device_id)
        .bind(&input.data_type)
        .bind(input.data_value)
        .bind(&input.unit)
        .bind(&input.prefix)
        .bind(input.raw_pressure)
        .bind(input.raw_temperature)
        .bind(input.raw_voltage)
        .bind(input.gps.latitude)
        .bind(input.gps.longitude)
        .bind(input.gps.altitude)
        .bind(input.gps.speed)
        .bind(input.gps.course)
        .bind(input.gps.satellites)
        .bind(input.timestamp)
}
