//! Handlers for the `/devices` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fleetwatch_core::error::CoreError;
use fleetwatch_core::types::DbId;
use fleetwatch_db::models::device::{CreateDevice, Device};
use fleetwatch_db::repositories::DeviceRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/devices
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateDevice>,
) -> AppResult<(StatusCode, Json<DataResponse<Device>>)> {
    if input.device_id.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "device_id is required".to_string(),
        )));
    }
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name is required".to_string(),
        )));
    }

    let device = DeviceRepo::create(&state.pool, &input).await?;
    tracing::info!(id = device.id, device_id = %device.device_id, "Device registered");
    Ok((StatusCode::CREATED, Json(DataResponse { data: device })))
}

/// GET /api/v1/devices
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Device>>>> {
    let devices = DeviceRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: devices }))
}

/// GET /api/v1/devices/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Device>>> {
    let device = DeviceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Device",
            id,
        }))?;
    Ok(Json(DataResponse { data: device }))
}
