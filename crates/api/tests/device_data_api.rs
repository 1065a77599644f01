//! HTTP-level integration tests for device registration, telemetry ingestion
//! and threshold alerting.
//!
//! The alert notifier is replaced with a recorder so tests can assert on
//! exactly which alerts were sent.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_device, get, post_json, RecordingNotifier};
use serde_json::json;
use sqlx::PgPool;

fn approx(value: &serde_json::Value, expected: f64) -> bool {
    value.as_f64().is_some_and(|v| (v - expected).abs() < 1e-9)
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_and_fetch_device(pool: PgPool) {
    let id = create_device(&pool, "ESP32_T1", "Truck 1").await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/devices/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["device_id"], "ESP32_T1");
    assert_eq!(json["data"]["is_active"], true);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/devices").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_device_id_returns_409(pool: PgPool) {
    create_device(&pool, "DUP", "First").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/devices",
        json!({"device_id": "DUP", "name": "Second"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_device_name_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/devices",
        json!({"device_id": "X1", "name": "  "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_device_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/devices/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Ingestion and alerting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn temperature_above_max_sends_one_alert(pool: PgPool) {
    let id = create_device(&pool, "ESP32_T1", "Truck 1").await;
    let notifier = RecordingNotifier::new();

    let app = common::build_test_app_with(pool, notifier.clone());
    let response = post_json(
        app,
        "/api/v1/device-data",
        json!({"device_id": id, "data_type": "temperature", "data_value": 40.0}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["alerts_triggered"], 1);
    assert_eq!(json["data"]["readings"][0]["unit"], "°C");

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1, "exactly one alert per breaching point");
    assert_eq!(sent[0].subject, "[Alert] Temperature above threshold on Truck 1");
    assert!(sent[0].html.contains("Threshold (max): 35.00 °C"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn in_range_and_unconfigured_types_do_not_alert(pool: PgPool) {
    let id = create_device(&pool, "ESP32_T1", "Truck 1").await;
    let notifier = RecordingNotifier::new();

    for (data_type, value) in [("humidity", 50.0), ("co2", 500.0), ("temperature", 35.0)] {
        let app = common::build_test_app_with(pool.clone(), notifier.clone());
        let response = post_json(
            app,
            "/api/v1/device-data",
            json!({"device_id": id, "data_type": data_type, "data_value": value}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["data"]["alerts_triggered"], 0);
    }

    assert!(notifier.sent().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn notifier_failure_does_not_fail_ingestion(pool: PgPool) {
    let id = create_device(&pool, "ESP32_T1", "Truck 1").await;
    let notifier = RecordingNotifier::failing();

    let app = common::build_test_app_with(pool.clone(), notifier.clone());
    let response = post_json(
        app,
        "/api/v1/device-data",
        json!({"device_id": id, "data_type": "humidity", "data_value": 10.0}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["alerts_triggered"], 1);
    assert_eq!(notifier.sent().len(), 1);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/device-data").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1, "reading was stored");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn raw_sample_is_converted_and_stored(pool: PgPool) {
    let id = create_device(&pool, "RX-1", "Receptor 1").await;
    let notifier = RecordingNotifier::new();

    let app = common::build_test_app_with(pool.clone(), notifier.clone());
    let response = post_json(
        app,
        "/api/v1/device-data",
        json!({
            "device_id": id,
            "prefix": "RPS_A-0042",
            "raw_pressure": 10.0,
            "raw_temperature": 80.0,
            "raw_voltage": 3.3,
            "latitude": 19.43,
            "longitude": -99.13
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let readings = json["data"]["readings"].as_array().unwrap();
    assert_eq!(readings.len(), 3);

    assert_eq!(readings[0]["data_type"], "pressure");
    assert!(approx(&readings[0]["data_value"], 115.2));
    assert_eq!(readings[0]["unit"], "kPa");
    assert_eq!(readings[0]["prefix"], "RPS_A-0042");
    assert_eq!(readings[1]["data_type"], "temperature");
    assert!(approx(&readings[1]["data_value"], 25.0));
    assert_eq!(readings[2]["data_type"], "voltage");
    assert!(approx(&readings[2]["data_value"], 3.3));
    assert!(approx(&readings[2]["latitude"], 19.43));

    // 115.2 kPa is above the 105 kPa default maximum.
    assert_eq!(json["data"]["alerts_triggered"], 1);
    assert_eq!(
        notifier.sent()[0].subject,
        "[Alert] Pressure above threshold on Receptor 1"
    );

    let pressure_id = readings[0]["id"].as_i64().unwrap();
    let app = common::build_test_app(pool.clone());
    let detail = body_json(get(app, &format!("/api/v1/device-data/{pressure_id}")).await).await;
    assert!(approx(&detail["data"]["pressure_kpa"], 115.2));
    assert!(approx(&detail["data"]["temperature_celsius"], 25.0));
    assert!(approx(&detail["data"]["voltage_volts"], 3.3));

    let app = common::build_test_app(pool);
    let device = body_json(get(app, &format!("/api/v1/devices/{id}")).await).await;
    assert!(device["data"]["last_seen"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn overflowing_pressure_is_not_stored_or_alerted(pool: PgPool) {
    let id = create_device(&pool, "RX-1", "Receptor 1").await;
    let notifier = RecordingNotifier::new();

    let app = common::build_test_app_with(pool, notifier.clone());
    let response = post_json(
        app,
        "/api/v1/device-data",
        json!({
            "device_id": id,
            "prefix": "RPS_A",
            "raw_pressure": 1e308,
            "raw_temperature": 80.0
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let readings = json["data"]["readings"].as_array().unwrap();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0]["data_type"], "temperature");
    assert!(approx(&readings[0]["raw_pressure"], 1e308));
    assert_eq!(json["data"]["alerts_triggered"], 0);
    assert!(notifier.sent().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_device_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/device-data",
        json!({"device_id": 424242, "data_type": "co2", "data_value": 400.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn request_without_points_returns_400(pool: PgPool) {
    let id = create_device(&pool, "RX-1", "Receptor 1").await;

    // Unknown prefix and no direct reading: nothing has a data type to be
    // stored under.
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/device-data",
        json!({"device_id": id, "prefix": "XYZ", "raw_pressure": 10.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("no storable reading"));
    assert!(!message.contains("prefix"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn direct_reading_keeps_unconverted_raw_sample(pool: PgPool) {
    let id = create_device(&pool, "RX-1", "Receptor 1").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/device-data",
        json!({
            "device_id": id,
            "data_type": "humidity",
            "data_value": 50.0,
            "prefix": "XYZ",
            "raw_pressure": 10.0
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let readings = json["data"]["readings"].as_array().unwrap();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0]["data_type"], "humidity");
    assert_eq!(readings[0]["prefix"], "XYZ");
    assert!(approx(&readings[0]["raw_pressure"], 10.0));

    let row_id = readings[0]["id"].as_i64().unwrap();
    let app = common::build_test_app(pool);
    let detail = body_json(get(app, &format!("/api/v1/device-data/{row_id}")).await).await;
    assert!(approx(&detail["data"]["raw_pressure"], 10.0));
    assert!(detail["data"]["pressure_kpa"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mismatched_unit_returns_400(pool: PgPool) {
    let id = create_device(&pool, "ESP32_T1", "Truck 1").await;
    let notifier = RecordingNotifier::new();

    let app = common::build_test_app_with(pool, notifier.clone());
    let response = post_json(
        app,
        "/api/v1/device-data",
        json!({"device_id": id, "data_type": "pressure", "data_value": 200.0, "unit": "psi"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert!(notifier.sent().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_type_and_rejects_unknown_types(pool: PgPool) {
    let id = create_device(&pool, "ESP32_T1", "Truck 1").await;
    for (data_type, value) in [("humidity", 40.0), ("co2", 450.0)] {
        let app = common::build_test_app(pool.clone());
        post_json(
            app,
            "/api/v1/device-data",
            json!({"device_id": id, "data_type": data_type, "data_value": value}),
        )
        .await;
    }

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/v1/device-data?device_id={id}&data_type=co2")).await).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["data_type"], "co2");

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/device-data?data_type=radiation").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Thresholds and conversion preview
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn thresholds_lists_active_ranges(pool: PgPool) {
    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/thresholds").await).await;

    assert_eq!(json["data"]["temperature_strategy"], "offset55");
    let entries = json["data"]["thresholds"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["data_type"], "temperature");
    assert_eq!(entries[0]["min"], 5.0);
    assert_eq!(entries[0]["max"], 35.0);
    assert_eq!(entries[2]["data_type"], "pressure");
    assert_eq!(entries[2]["unit"], "kPa");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn conversion_preview_applies_formulas(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let json = body_json(
        post_json(
            app,
            "/api/v1/conversions/preview",
            json!({"prefix": "RPS_B", "raw_pressure": 0.0, "raw_temperature": 60.0}),
        )
        .await,
    )
    .await;

    assert_eq!(json["data"]["prefix_recognized"], true);
    assert!(approx(&json["data"]["pressure_kpa"], 98.428));
    assert!(approx(&json["data"]["temperature_celsius"], 5.0));
    assert!(json["data"]["voltage_volts"].is_null());

    let app = common::build_test_app(pool);
    let json = body_json(
        post_json(
            app,
            "/api/v1/conversions/preview",
            json!({"prefix": "unknown", "raw_pressure": 10.0}),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["prefix_recognized"], false);
    assert!(json["data"]["pressure_kpa"].is_null());
}
