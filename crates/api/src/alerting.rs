//! Threshold alerting for ingested data points.
//!
//! Every stored data point is evaluated against the active
//! [`ThresholdConfig`](fleetwatch_core::thresholds::ThresholdConfig). A point
//! that breaches its range is rendered with [`format_alert`] and handed to the
//! notifier exactly once. Delivery failures are logged and never fail the
//! ingestion request.

use fleetwatch_core::alert::{format_alert, AlertDecision};
use fleetwatch_core::telemetry::DataPoint;
use fleetwatch_core::thresholds::ThresholdConfig;
use fleetwatch_db::models::device::Device;
use fleetwatch_events::AlertNotifier;

/// Evaluate one data point and send an alert if it breaches its range.
pub async fn process_point(
    thresholds: &ThresholdConfig,
    notifier: &dyn AlertNotifier,
    device: &Device,
    point: &DataPoint,
) -> AlertDecision {
    let decision = thresholds.evaluate(point.data_type, point.value);
    let Some(breach) = decision.breach() else {
        return decision;
    };

    tracing::info!(
        device_id = device.id,
        device_code = %device.device_id,
        data_type = %point.data_type,
        value = point.value,
        direction = breach.direction.as_str(),
        threshold = breach.threshold,
        "Threshold breached"
    );

    let message = format_alert(&device.name, &device.device_id, point, breach);
    if !notifier.send_alert(&message.subject, &message.html, None).await {
        tracing::warn!(
            device_id = device.id,
            data_type = %point.data_type,
            "Alert notification was not delivered"
        );
    }

    decision
}

/// Evaluate a batch of data points in order. Returns how many triggered.
pub async fn process_points(
    thresholds: &ThresholdConfig,
    notifier: &dyn AlertNotifier,
    device: &Device,
    points: &[DataPoint],
) -> usize {
    let mut triggered = 0;
    for point in points {
        if process_point(thresholds, notifier, device, point)
            .await
            .is_triggered()
        {
            triggered += 1;
        }
    }
    triggered
}
