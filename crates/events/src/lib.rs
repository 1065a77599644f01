//! Fleetwatch alert notification delivery.
//!
//! - [`AlertNotifier`]: the seam the ingestion pipeline dispatches alerts
//!   through.
//! - [`AlertMailer`]: the email implementation: resolves recipients and
//!   hands the message to a configured [`MailTransport`].
//! - [`delivery`]: concrete transports (Resend HTTP API, SMTP).

pub mod delivery;
pub mod mailer;

pub use delivery::email::{EmailConfig, EmailError, MailTransport, OutgoingEmail};
pub use delivery::resend::ResendTransport;
pub use delivery::smtp::SmtpTransport;
pub use mailer::{AlertMailer, AlertNotifier};
