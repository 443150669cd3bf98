//! Email delivery over an implicit-TLS SMTP relay.
//!
//! One message, one recipient, one attempt. The sender address doubles as the
//! SMTP username, which is how Gmail app passwords expect to be used.

use crate::config::Config;
use crate::errors::{DigestError, Result};
use crate::models::EmailMessage;
use lettre::message::{Mailbox, MultiPart, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt;
use std::time::Instant;
use tracing::{info, instrument};

/// Delivers a finished digest.
pub trait Notifier {
    /// Send `body` under `subject` to the configured recipient.
    async fn notify(&self, subject: &str, body: &str) -> Result<()>;
}

impl EmailMessage {
    /// Convert into a `multipart/mixed` MIME message with a single
    /// `text/plain` part.
    pub fn to_mime(&self) -> Result<Message> {
        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| DigestError::delivery(format!("invalid from address {:?}: {e}", self.from)))?;
        let to: Mailbox = self
            .to
            .parse()
            .map_err(|e| DigestError::delivery(format!("invalid to address {:?}: {e}", self.to)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject.as_str())
            .multipart(
                MultiPart::mixed().singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(self.body.clone()),
                ),
            )
            .map_err(|e| DigestError::delivery(format!("failed to build email message: {e}")))
    }
}

/// Authenticated SMTP sender for the digest.
#[derive(Clone)]
pub struct SmtpNotifier {
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<String>,
    recipient: Option<String>,
}

impl SmtpNotifier {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: Option<String>,
        password: Option<String>,
        recipient: Option<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username,
            password,
            recipient,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.smtp_host.clone(),
            config.smtp_port,
            config.email_user.clone(),
            config.email_pass.clone(),
            config.email_to.clone(),
        )
    }

    /// Assemble the envelope for this sender and recipient.
    pub fn compose(&self, subject: &str, body: &str) -> Result<EmailMessage> {
        let from = self
            .username
            .clone()
            .ok_or_else(|| DigestError::delivery("EMAIL_USER is not set"))?;
        let to = self
            .recipient
            .clone()
            .ok_or_else(|| DigestError::delivery("EMAIL_TO is not set"))?;

        Ok(EmailMessage {
            from,
            to,
            subject: subject.to_string(),
            body: body.to_string(),
        })
    }
}

impl fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("recipient", &self.recipient)
            .finish()
    }
}

impl Notifier for SmtpNotifier {
    #[instrument(level = "info", skip_all, fields(host = %self.host, port = self.port))]
    async fn notify(&self, subject: &str, body: &str) -> Result<()> {
        let envelope = self.compose(subject, body)?;
        let password = self
            .password
            .clone()
            .ok_or_else(|| DigestError::delivery("EMAIL_PASS is not set"))?;
        let message = envelope.to_mime()?;

        let creds = Credentials::new(envelope.from.clone(), password);
        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
                .map_err(|e| DigestError::delivery(format!("failed to create SMTP transport: {e}")))?
                .port(self.port)
                .credentials(creds)
                .build();

        let t0 = Instant::now();
        mailer
            .send(message)
            .await
            .map_err(|e| DigestError::delivery(format!("SMTP send failed: {e}")))?;

        info!(
            to = %envelope.to,
            subject,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Email accepted for relay"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier(username: Option<&str>, password: Option<&str>, to: Option<&str>) -> SmtpNotifier {
        SmtpNotifier::new(
            "smtp.example.com",
            465,
            username.map(String::from),
            password.map(String::from),
            to.map(String::from),
        )
    }

    #[test]
    fn test_compose_uses_username_as_sender() {
        let n = notifier(Some("me@example.com"), Some("pw"), Some("you@example.com"));
        let msg = n.compose("Daily News Digest", "body").unwrap();
        assert_eq!(
            msg,
            EmailMessage {
                from: "me@example.com".to_string(),
                to: "you@example.com".to_string(),
                subject: "Daily News Digest".to_string(),
                body: "body".to_string(),
            }
        );
    }

    #[test]
    fn test_to_mime_is_multipart_plain_text() {
        let msg = EmailMessage {
            from: "me@example.com".to_string(),
            to: "you@example.com".to_string(),
            subject: "Daily News Digest".to_string(),
            body: "hello reader".to_string(),
        };
        let raw = String::from_utf8(msg.to_mime().unwrap().formatted()).unwrap();
        assert!(raw.contains("Subject: Daily News Digest"));
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("hello reader"));
    }

    #[test]
    fn test_invalid_address_is_delivery_error() {
        let msg = EmailMessage {
            from: "me@example.com".to_string(),
            to: "not an address".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
        };
        assert!(matches!(msg.to_mime(), Err(DigestError::Delivery(_))));
    }

    #[tokio::test]
    async fn test_missing_recipient_fails_before_connecting() {
        let n = notifier(Some("me@example.com"), Some("pw"), None);
        let err = n.notify("s", "b").await.unwrap_err();
        assert!(err.to_string().contains("EMAIL_TO"));
    }

    #[tokio::test]
    async fn test_missing_password_fails_before_connecting() {
        let n = notifier(Some("me@example.com"), None, Some("you@example.com"));
        let err = n.notify("s", "b").await.unwrap_err();
        assert!(err.to_string().contains("EMAIL_PASS"));
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_delivery_error() {
        let n = SmtpNotifier::new(
            "127.0.0.1",
            9,
            Some("me@example.com".to_string()),
            Some("pw".to_string()),
            Some("you@example.com".to_string()),
        );
        let err = n.notify("Daily News Digest", "body").await.unwrap_err();
        match err {
            DigestError::Delivery(reason) => assert!(reason.starts_with("SMTP send failed")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_debug_hides_password() {
        let n = notifier(Some("me@example.com"), Some("hunter2"), Some("you@example.com"));
        assert!(!format!("{n:?}").contains("hunter2"));
    }
}
