//! Threshold alert decisions and the notification message built from them.

use serde::Serialize;

use crate::telemetry::DataPoint;

/// Which side of the configured range a value fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Deviation {
    Below,
    Above,
}

impl Deviation {
    pub fn as_str(self) -> &'static str {
        match self {
            Deviation::Below => "below",
            Deviation::Above => "above",
        }
    }
}

/// The configured bound that was crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdBound {
    Min,
    Max,
}

impl ThresholdBound {
    pub fn as_str(self) -> &'static str {
        match self {
            ThresholdBound::Min => "min",
            ThresholdBound::Max => "max",
        }
    }
}

/// Details of an out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Breach {
    pub direction: Deviation,
    pub bound: ThresholdBound,
    /// Value of the bound that was crossed.
    pub threshold: f64,
}

/// Outcome of evaluating one value against the threshold configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AlertDecision {
    /// In range, or no range configured for the data type.
    NotTriggered,
    Triggered(Breach),
}

impl AlertDecision {
    pub fn is_triggered(&self) -> bool {
        matches!(self, AlertDecision::Triggered(_))
    }

    pub fn breach(&self) -> Option<&Breach> {
        match self {
            AlertDecision::Triggered(breach) => Some(breach),
            AlertDecision::NotTriggered => None,
        }
    }
}

/// A rendered alert notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub subject: String,
    pub html: String,
}

/// Render the notification for a data point that breached its range.
///
/// `device_name` is the display name, `device_code` the hardware identifier.
pub fn format_alert(
    device_name: &str,
    device_code: &str,
    point: &DataPoint,
    breach: &Breach,
) -> AlertMessage {
    let label = point.data_type.label();
    let unit = point.unit_display();
    let name = escape_html(device_name);
    let code = escape_html(device_code);

    let subject = format!(
        "[Alert] {label} {} threshold on {device_name}",
        breach.direction.as_str()
    );

    let html = format!(
        "<h2>Threshold alert: {label}</h2>\
         <p>Device <strong>{name}</strong> ({code}) reported a value {direction} the configured range.</p>\
         <ul>\
         <li>Type: {label}</li>\
         <li>Value: {value:.2} {unit}</li>\
         <li>Threshold ({bound}): {threshold:.2} {unit}</li>\
         <li>Time: {time}</li>\
         </ul>",
        direction = breach.direction.as_str(),
        value = point.value,
        bound = breach.bound.as_str(),
        threshold = breach.threshold,
        time = point.timestamp.to_rfc3339(),
    );

    AlertMessage { subject, html }
}

/// Minimal HTML escaping for values interpolated into alert bodies.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
