// File: ./src/client/mail.rs
use crate::client::Mailer;
use crate::config::MailConfig;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// Admin notifications over authenticated SMTP (STARTTLS).
#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let transport = SmtpTransport::starttls_relay(&config.host)
            .with_context(|| format!("Invalid SMTP host '{}'", config.host))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self { transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, from: &str, to: &str, subject: &str, body: &str) -> Result<()> {
        let email = Message::builder()
            .from(from.parse().with_context(|| format!("Bad sender '{}'", from))?)
            .to(to.parse().with_context(|| format!("Bad recipient '{}'", to))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| anyhow!("Mail task failed: {}", e))?
            .context("SMTP delivery failed")?;
        log::info!("Sent '{}' to {}", subject, to);
        Ok(())
    }
}
