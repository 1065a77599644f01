use axum::routing::post;
use axum::Router;

use crate::handlers::conversions;
use crate::state::AppState;

/// Routes mounted at `/conversions`.
///
/// ```text
/// POST /preview -> preview
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/preview", post(conversions::preview))
}
