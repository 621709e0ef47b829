//! Digest delivery over SMTP.

use async_trait::async_trait;
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
/// Implicit TLS
pub const DEFAULT_SMTP_PORT: u16 = 465;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mail address {address:?}: {reason}")]
    Address { address: String, reason: String },

    #[error("No recipients configured")]
    NoRecipients,

    #[error("Failed to build mail message: {0}")]
    Build(String),

    #[error("Failed to send mail: {0}")]
    Transport(String),
}

/// Delivers a plain-text message to a fixed set of recipients.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Connection and account settings for [`SmtpMailer`].
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Sender address, also used as the login name
    pub sender: String,
    pub password: String,
    /// One or more addresses separated by commas
    pub recipients: String,
}

impl SmtpSettings {
    pub fn new(
        sender: impl Into<String>,
        password: impl Into<String>,
        recipients: impl Into<String>,
    ) -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
            sender: sender.into(),
            password: password.into(),
            recipients: recipients.into(),
        }
    }

    pub fn with_server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse::<Mailbox>().map_err(|e| MailError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// Split a comma-separated recipient list, ignoring blank entries.
pub fn parse_recipients(list: &str) -> Result<Vec<Mailbox>, MailError> {
    let recipients = list
        .split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(parse_mailbox)
        .collect::<Result<Vec<_>, _>>()?;

    if recipients.is_empty() {
        return Err(MailError::NoRecipients);
    }
    Ok(recipients)
}

/// Sends mail through an authenticated SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl SmtpMailer {
    /// Validate addresses and configure the relay. No connection is made yet.
    pub fn new(settings: &SmtpSettings) -> Result<Self, MailError> {
        let from = parse_mailbox(settings.sender.trim())?;
        let to = parse_recipients(&settings.recipients)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
            .map_err(|e| MailError::Transport(format!("Failed to configure SMTP transport: {}", e)))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.sender.trim().to_string(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self { transport, from, to })
    }

    pub fn recipients(&self) -> &[Mailbox] {
        &self.to
    }

    /// Build the plain-text message addressed to every recipient.
    pub fn build_message(&self, subject: &str, body: &str) -> Result<Message, MailError> {
        let builder = self.to.iter().fold(
            Message::builder().from(self.from.clone()).subject(subject),
            |builder, to| builder.to(to.clone()),
        );

        builder
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl MailSender for SmtpMailer {
    async fn send(&self, subject: &str, body: &str) -> Result<(), MailError> {
        let message = self.build_message(subject, body)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        info!(subject, recipients = self.to.len(), "Mail sent");
        Ok(())
    }
}
