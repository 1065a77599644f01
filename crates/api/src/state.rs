use std::sync::Arc;

use fleetwatch_events::AlertNotifier;

use crate::config::{ServerConfig, TelemetryConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fleetwatch_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Conversion strategy and threshold ranges, read-only after startup.
    pub telemetry: Arc<TelemetryConfig>,
    /// Where threshold alerts are sent.
    pub notifier: Arc<dyn AlertNotifier>,
}
