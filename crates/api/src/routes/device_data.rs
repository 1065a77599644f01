//! Route definitions for device telemetry ingestion and history.

use axum::routing::get;
use axum::Router;

use crate::handlers::device_data;
use crate::state::AppState;

/// Routes mounted at `/device-data`.
///
/// ```text
/// GET  /        -> list
/// POST /        -> ingest
/// GET  /{id}    -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(device_data::list).post(device_data::ingest))
        .route("/{id}", get(device_data::get_by_id))
}
