#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use fleetwatch_api::config::{ServerConfig, TelemetryConfig};
use fleetwatch_core::conversion::TemperatureStrategy;
use fleetwatch_core::thresholds::ThresholdConfig;
use fleetwatch_api::router::build_app_router;
use fleetwatch_api::state::AppState;
use fleetwatch_events::AlertNotifier;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
    }
}

// ---------------------------------------------------------------------------
// Fake notifier
// ---------------------------------------------------------------------------

/// One captured `send_alert` call.
#[derive(Debug, Clone)]
pub struct SentAlert {
    pub subject: String,
    pub html: String,
}

/// Records alerts instead of sending them. `succeed` is what `send_alert`
/// reports back; `enabled` is what `is_enabled` reports.
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<SentAlert>>,
    pub succeed: bool,
    pub enabled: bool,
}

impl RecordingNotifier {
    fn with(succeed: bool, enabled: bool) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            succeed,
            enabled,
        })
    }

    pub fn new() -> Arc<Self> {
        Self::with(true, true)
    }

    pub fn failing() -> Arc<Self> {
        Self::with(false, true)
    }

    /// Behaves like a mailer with no transport configured.
    pub fn disabled() -> Arc<Self> {
        Self::with(false, false)
    }

    pub fn sent(&self) -> Vec<SentAlert> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertNotifier for RecordingNotifier {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send_alert(&self, subject: &str, html: &str, _recipients: Option<&[String]>) -> bool {
        self.sent.lock().unwrap().push(SentAlert {
            subject: subject.to_string(),
            html: html.to_string(),
        });
        self.succeed
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Build the full application router with default telemetry configuration
/// and a notifier that records nothing of interest.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, RecordingNotifier::new())
}

/// Build the full application router with the given notifier, using the
/// same middleware stack as production.
pub fn build_test_app_with(pool: PgPool, notifier: Arc<RecordingNotifier>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        telemetry: Arc::new(TelemetryConfig {
            temperature_strategy: TemperatureStrategy::Offset55,
            thresholds: ThresholdConfig::defaults(),
        }),
        notifier,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a device through the API and return its registry id.
pub async fn create_device(pool: &PgPool, code: &str, name: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/devices",
        serde_json::json!({"device_id": code, "name": name}),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
