//! Conversion preview: run a raw sample through the conversion formulas
//! without storing anything.

use axum::extract::State;
use axum::Json;
use fleetwatch_core::conversion::{PressureFormula, TemperatureStrategy};
use fleetwatch_core::telemetry::RawSample;
use serde::{Deserialize, Serialize};

use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub prefix: Option<String>,
    pub raw_pressure: Option<f64>,
    pub raw_temperature: Option<f64>,
    pub raw_voltage: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    /// Whether the prefix selects a pressure formula.
    pub prefix_recognized: bool,
    pub temperature_strategy: TemperatureStrategy,
    pub pressure_kpa: Option<f64>,
    pub temperature_celsius: Option<f64>,
    pub voltage_volts: Option<f64>,
}

/// POST /api/v1/conversions/preview
pub async fn preview(
    State(state): State<AppState>,
    Json(input): Json<PreviewRequest>,
) -> Json<DataResponse<PreviewResponse>> {
    let strategy = state.telemetry.temperature_strategy;
    let sample = RawSample {
        prefix: input.prefix.unwrap_or_default(),
        raw_pressure: input.raw_pressure,
        raw_temperature: input.raw_temperature,
        raw_voltage: input.raw_voltage,
    };

    Json(DataResponse {
        data: PreviewResponse {
            prefix_recognized: PressureFormula::from_prefix(&sample.prefix)
                != PressureFormula::Unknown,
            temperature_strategy: strategy,
            pressure_kpa: sample.pressure_kpa(),
            temperature_celsius: sample.temperature_celsius(strategy),
            voltage_volts: sample.voltage_volts(),
        },
    })
}
