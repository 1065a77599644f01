pub mod conversions;
pub mod device_data;
pub mod devices;
pub mod health;
pub mod thresholds;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /devices                    list, register
/// /devices/{id}               get
///
/// /device-data                list (filters + paging), ingest (POST)
/// /device-data/{id}           get with derived values
///
/// /thresholds                 active threshold configuration
///
/// /conversions/preview        convert a raw sample (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/devices", devices::router())
        .nest("/device-data", device_data::router())
        .nest("/thresholds", thresholds::router())
        .nest("/conversions", conversions::router())
}
