//! Email delivery configuration, errors and the transport seam.
//!
//! Configuration is loaded from environment variables. Two transports are
//! supported: the Resend HTTP API (`RESEND_API_KEY`) and plain SMTP
//! (`SMTP_HOST`). When both are configured Resend is used. When neither is,
//! [`EmailConfig::build_transport`] returns `None` and alerts are logged but
//! not sent.

use std::sync::Arc;

use async_trait::async_trait;

use crate::delivery::resend::ResendTransport;
use crate::delivery::smtp::SmtpTransport;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// The HTTP request to the mail API failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The mail API returned a non-2xx status code.
    #[error("Mail API returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// A fully addressed email ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Something that can deliver an [`OutgoingEmail`].
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Short transport name for logs (`"resend"`, `"smtp"`).
    fn name(&self) -> &'static str;

    /// Send the email, returning the provider's message id when it has one.
    async fn send(&self, email: &OutgoingEmail) -> Result<Option<String>, EmailError>;
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender when `DEFAULT_FROM_EMAIL` is not set.
const DEFAULT_FROM_ADDRESS: &str = "Fleetwatch Alerts <alerts@fleetwatch.local>";

/// Default Resend API base URL.
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

/// SMTP connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Configuration for alert email delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Recipients used when an alert does not name its own.
    pub default_recipients: Vec<String>,
    /// Resend API key; selects the Resend transport when set.
    pub resend_api_key: Option<String>,
    /// Resend API base URL.
    pub resend_api_url: String,
    /// SMTP settings; used when no Resend key is configured.
    pub smtp: Option<SmtpSettings>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                 | Required | Default                                        |
    /// |--------------------------|----------|------------------------------------------------|
    /// | `DEFAULT_FROM_EMAIL`     | no       | `Fleetwatch Alerts <alerts@fleetwatch.local>`  |
    /// | `ALERT_EMAIL_RECIPIENTS` | no       | (none, comma-separated)                        |
    /// | `RESEND_API_KEY`         | no       |                                                |
    /// | `RESEND_API_URL`         | no       | `https://api.resend.com`                       |
    /// | `SMTP_HOST`              | no       |                                                |
    /// | `SMTP_PORT`              | no       | `587`                                          |
    /// | `SMTP_USER`              | no       |                                                |
    /// | `SMTP_PASSWORD`          | no       |                                                |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let default_recipients = non_empty("ALERT_EMAIL_RECIPIENTS")
            .map(|list| {
                list.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let smtp = non_empty("SMTP_HOST").map(|host| SmtpSettings {
            host,
            port: non_empty("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            user: non_empty("SMTP_USER"),
            password: non_empty("SMTP_PASSWORD"),
        });

        Self {
            from_address: non_empty("DEFAULT_FROM_EMAIL")
                .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            default_recipients,
            resend_api_key: non_empty("RESEND_API_KEY"),
            resend_api_url: non_empty("RESEND_API_URL")
                .unwrap_or_else(|| DEFAULT_RESEND_API_URL.to_string()),
            smtp,
        }
    }

    /// Construct the configured transport, if any.
    ///
    /// A transport that fails to build (e.g. an invalid SMTP host) is
    /// logged and treated as not configured.
    pub fn build_transport(&self) -> Option<Arc<dyn MailTransport>> {
        if let Some(api_key) = &self.resend_api_key {
            return match ResendTransport::new(&self.resend_api_url, api_key) {
                Ok(t) => Some(Arc::new(t)),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to build Resend transport");
                    None
                }
            };
        }

        if let Some(smtp) = &self.smtp {
            return match SmtpTransport::new(smtp) {
                Ok(t) => Some(Arc::new(t)),
                Err(e) => {
                    tracing::error!(error = %e, host = %smtp.host, "Failed to build SMTP transport");
                    None
                }
            };
        }

        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
