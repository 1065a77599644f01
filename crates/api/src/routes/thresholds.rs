use axum::routing::get;
use axum::Router;

use crate::handlers::thresholds;
use crate::state::AppState;

/// Routes mounted at `/thresholds`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(thresholds::list))
}
