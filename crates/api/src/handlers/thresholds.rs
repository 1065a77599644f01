//! Read-only view of the active threshold configuration.

use axum::extract::State;
use axum::Json;
use fleetwatch_core::conversion::TemperatureStrategy;
use fleetwatch_core::data_type::DataType;
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

/// One configured range.
#[derive(Debug, Serialize)]
pub struct ThresholdEntry {
    pub data_type: DataType,
    pub label: &'static str,
    pub unit: Option<&'static str>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ThresholdsResponse {
    pub temperature_strategy: TemperatureStrategy,
    pub thresholds: Vec<ThresholdEntry>,
}

/// GET /api/v1/thresholds
pub async fn list(State(state): State<AppState>) -> Json<DataResponse<ThresholdsResponse>> {
    let thresholds = state
        .telemetry
        .thresholds
        .entries()
        .into_iter()
        .map(|(data_type, range)| ThresholdEntry {
            data_type,
            label: data_type.label(),
            unit: data_type.canonical_unit(),
            min: range.min,
            max: range.max,
        })
        .collect();

    Json(DataResponse {
        data: ThresholdsResponse {
            temperature_strategy: state.telemetry.temperature_strategy,
            thresholds,
        },
    })
}
