//! Handlers for device telemetry: ingestion with threshold alerting, and
//! history reads.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use fleetwatch_core::conversion::TemperatureStrategy;
use fleetwatch_core::data_type::DataType;
use fleetwatch_core::error::CoreError;
use fleetwatch_core::telemetry::{DataPoint, RawSample};
use fleetwatch_core::types::{DbId, Timestamp};
use fleetwatch_db::models::device_data::{
    CreateDeviceData, DeviceData, DeviceDataFilter, GpsFix,
};
use fleetwatch_db::repositories::{DeviceDataRepo, DeviceRepo};
use serde::{Deserialize, Serialize};

use crate::alerting;
use crate::error::{AppError, AppResult};
use crate::query::DeviceDataQuery;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /device-data`.
///
/// Carries a direct reading (`data_type` + `data_value`), a raw sample
/// (`raw_pressure` / `raw_temperature` / `raw_voltage` with a `prefix`), or
/// both.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    /// Registry id of the reporting device.
    pub device_id: DbId,
    pub data_type: Option<String>,
    pub data_value: Option<f64>,
    pub unit: Option<String>,
    pub prefix: Option<String>,
    pub raw_pressure: Option<f64>,
    pub raw_temperature: Option<f64>,
    pub raw_voltage: Option<f64>,
    #[serde(flatten)]
    pub gps: GpsFix,
    /// Defaults to the time the request is handled.
    pub timestamp: Option<Timestamp>,
}

impl IngestRequest {
    fn raw_sample(&self) -> Option<RawSample> {
        let sample = RawSample {
            prefix: self.prefix.clone().unwrap_or_default(),
            raw_pressure: self.raw_pressure,
            raw_temperature: self.raw_temperature,
            raw_voltage: self.raw_voltage,
        };
        (!sample.is_empty()).then_some(sample)
    }

    fn direct_point(&self, timestamp: Timestamp) -> Result<Option<DataPoint>, CoreError> {
        match (&self.data_type, self.data_value) {
            (None, None) => Ok(None),
            (Some(data_type), Some(value)) => {
                let data_type: DataType = data_type.parse()?;
                DataPoint::new(data_type, value, self.unit.as_deref(), timestamp).map(Some)
            }
            (Some(_), None) => Err(CoreError::Validation(
                "data_value is required when data_type is set".to_string(),
            )),
            (None, Some(_)) => Err(CoreError::Validation(
                "data_type is required when data_value is set".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub readings: Vec<DeviceData>,
    pub alerts_triggered: usize,
}

/// A stored row plus the physical values derived from its raw fields.
#[derive(Debug, Serialize)]
pub struct DeviceDataDetail {
    #[serde(flatten)]
    pub row: DeviceData,
    pub pressure_kpa: Option<f64>,
    pub temperature_celsius: Option<f64>,
    pub voltage_volts: Option<f64>,
}

impl DeviceDataDetail {
    fn derive(row: DeviceData, strategy: TemperatureStrategy) -> Self {
        let sample = RawSample {
            prefix: row.prefix.clone().unwrap_or_default(),
            raw_pressure: row.raw_pressure,
            raw_temperature: row.raw_temperature,
            raw_voltage: row.raw_voltage,
        };
        Self {
            pressure_kpa: sample.pressure_kpa(),
            temperature_celsius: sample.temperature_celsius(strategy),
            voltage_volts: sample.voltage_volts(),
            row,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/device-data
///
/// Persist the data points carried by the request, evaluate each against the
/// threshold configuration and send one alert per breaching point.
pub async fn ingest(
    State(state): State<AppState>,
    Json(input): Json<IngestRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<IngestResponse>>)> {
    let device = DeviceRepo::find_by_id(&state.pool, input.device_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Device",
            id: input.device_id,
        }))?;

    let timestamp = input.timestamp.unwrap_or_else(Utc::now);
    let strategy = state.telemetry.temperature_strategy;

    let mut rows = Vec::new();
    let mut points = Vec::new();

    if let Some(point) = input.direct_point(timestamp)? {
        rows.push(to_row(&input, &point));
        points.push(point);
    }

    if let Some(sample) = input.raw_sample() {
        for point in sample.to_data_points(strategy, timestamp) {
            rows.push(to_row(&input, &point));
            points.push(point);
        }
    }

    if points.is_empty() {
        return Err(AppError::BadRequest(
            "request carries no storable reading: send data_type with data_value, \
             or raw readings that convert to a physical value"
                .to_string(),
        ));
    }

    let readings = DeviceDataRepo::create_batch(&state.pool, &rows).await?;
    DeviceRepo::touch_last_seen(&state.pool, device.id, timestamp).await?;

    tracing::debug!(
        device_id = device.id,
        count = readings.len(),
        "Stored device data points"
    );

    let alerts_triggered = alerting::process_points(
        &state.telemetry.thresholds,
        state.notifier.as_ref(),
        &device,
        &points,
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: IngestResponse {
                readings,
                alerts_triggered,
            },
        }),
    ))
}

/// GET /api/v1/device-data
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<DeviceDataQuery>,
) -> AppResult<Json<DataResponse<Vec<DeviceData>>>> {
    let data_type = params
        .data_type
        .as_deref()
        .map(str::parse::<DataType>)
        .transpose()?;

    let filter = DeviceDataFilter {
        device_id: params.device_id,
        data_type: data_type.map(|t| t.as_str().to_string()),
        limit: params.limit,
        offset: params.offset,
    };
    let rows = DeviceDataRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/device-data/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeviceDataDetail>>> {
    let row = DeviceDataRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DeviceData",
            id,
        }))?;
    Ok(Json(DataResponse {
        data: DeviceDataDetail::derive(row, state.telemetry.temperature_strategy),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build the insert DTO for one point. Every row keeps the request's prefix
/// and raw readings, including channels that did not convert.
fn to_row(input: &IngestRequest, point: &DataPoint) -> CreateDeviceData {
    CreateDeviceData {
        device_id: input.device_id,
        data_type: point.data_type.as_str().to_string(),
        data_value: point.value,
        unit: point.unit.clone(),
        prefix: input.prefix.clone().filter(|p| !p.trim().is_empty()),
        raw_pressure: input.raw_pressure,
        raw_temperature: input.raw_temperature,
        raw_voltage: input.raw_voltage,
        gps: input.gps.clone(),
        timestamp: point.timestamp,
    }
}
