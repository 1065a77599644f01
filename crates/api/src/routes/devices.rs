//! Route definitions for the device registry.

use axum::routing::get;
use axum::Router;

use crate::handlers::devices;
use crate::state::AppState;

/// Routes mounted at `/devices`.
///
/// ```text
/// GET  /        -> list
/// POST /        -> create
/// GET  /{id}    -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(devices::list).post(devices::create))
        .route("/{id}", get(devices::get_by_id))
}
