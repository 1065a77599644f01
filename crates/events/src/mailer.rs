//! Alert email dispatch.
//!
//! [`AlertNotifier`] is what the ingestion pipeline calls when a data point
//! breaches its threshold. It reports success as a plain `bool`: delivery
//! problems are logged here and never surface as errors to the caller.

use std::sync::Arc;

use async_trait::async_trait;

use crate::delivery::email::{EmailConfig, MailTransport, OutgoingEmail};

/// Sends a rendered alert to a list of recipients.
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    /// Send `subject` / `html` to `recipients`, or to the configured default
    /// recipients when `None`. Returns `true` if the message was handed off.
    async fn send_alert(&self, subject: &str, html: &str, recipients: Option<&[String]>) -> bool;

    /// Whether alerts can be delivered at all.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Email-backed [`AlertNotifier`].
pub struct AlertMailer {
    transport: Option<Arc<dyn MailTransport>>,
    from_address: String,
    default_recipients: Vec<String>,
}

impl AlertMailer {
    pub fn new(
        transport: Option<Arc<dyn MailTransport>>,
        from_address: impl Into<String>,
        default_recipients: Vec<String>,
    ) -> Self {
        Self {
            transport,
            from_address: from_address.into(),
            default_recipients,
        }
    }

    /// Build a mailer from configuration, constructing its transport.
    pub fn from_config(config: &EmailConfig) -> Self {
        Self::new(
            config.build_transport(),
            config.from_address.clone(),
            config.default_recipients.clone(),
        )
    }
}

#[async_trait]
impl AlertNotifier for AlertMailer {
    fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    async fn send_alert(&self, subject: &str, html: &str, recipients: Option<&[String]>) -> bool {
        let Some(transport) = &self.transport else {
            tracing::error!(subject, "Cannot send alert email: no mail transport configured");
            return false;
        };

        let recipients = recipients.unwrap_or(&self.default_recipients);
        if recipients.is_empty() {
            tracing::warn!(subject, "No recipients configured for alert emails");
            return false;
        }

        let email = OutgoingEmail {
            from: self.from_address.clone(),
            to: recipients.to_vec(),
            subject: subject.to_string(),
            html: html.to_string(),
        };

        match transport.send(&email).await {
            Ok(message_id) => {
                tracing::info!(
                    transport = transport.name(),
                    recipients = ?email.to,
                    message_id = message_id.as_deref().unwrap_or("-"),
                    "Alert email sent"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    transport = transport.name(),
                    error = %e,
                    "Failed to send alert email"
                );
                false
            }
        }
    }
}
