//! SMTP transport backed by `lettre`'s async STARTTLS relay.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::delivery::email::{EmailError, MailTransport, OutgoingEmail, SmtpSettings};

/// Sends email through an SMTP relay.
pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    /// Build the relay from settings. Credentials are used only when both
    /// user and password are present.
    pub fn new(settings: &SmtpSettings) -> Result<Self, EmailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            .port(settings.port);

        if let (Some(user), Some(pass)) = (&settings.user, &settings.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
        })
    }
}

/// Assemble the MIME message for an outgoing email.
pub(crate) fn build_message(email: &OutgoingEmail) -> Result<Message, EmailError> {
    let mut builder = Message::builder()
        .from(email.from.parse::<Mailbox>()?)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML);

    for to in &email.to {
        builder = builder.to(to.parse::<Mailbox>()?);
    }

    builder
        .body(email.html.clone())
        .map_err(|e| EmailError::Build(e.to_string()))
}

#[async_trait]
impl MailTransport for SmtpTransport {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<Option<String>, EmailError> {
        let message = build_message(email)?;
        self.mailer.send(message).await?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(to: &[&str]) -> OutgoingEmail {
        OutgoingEmail {
            from: "Fleetwatch <alerts@example.com>".to_string(),
            to: to.iter().map(|s| s.to_string()).collect(),
            subject: "Threshold alert".to_string(),
            html: "<p>hot</p>".to_string(),
        }
    }

    #[test]
    fn builds_message_for_multiple_recipients() {
        let message = build_message(&email(&["a@example.com", "b@example.com"])).unwrap();
        let to = message.envelope().to();
        assert_eq!(to.len(), 2);
    }

    #[test]
    fn rejects_invalid_recipient() {
        let err = build_message(&email(&["not-an-email"])).unwrap_err();
        assert!(err.to_string().contains("Email address parse error"));
    }

    #[test]
    fn rejects_empty_recipient_list() {
        let err = build_message(&email(&[])).unwrap_err();
        assert!(matches!(err, EmailError::Build(_)));
    }
}
