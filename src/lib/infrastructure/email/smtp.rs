//! SMTP email service implementation

use std::fmt;

use async_trait::async_trait;
use clap::Parser;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
        response::Response,
    },
    Address, AsyncSmtpTransport, AsyncTransport, Message as Email, Tokio1Executor,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::communication::{
    mailer::{Mailer, MailerError, Message, Receipt},
    smtp::{ConfigurationError, RelaySettings, SmtpConfig},
};

/// Relay used when `SMTP_HOST` is not set
pub const DEFAULT_SMTP_HOST: &str = "smtp.yandex.ru";

/// Port used when `SMTP_PORT` is not set
pub const DEFAULT_SMTP_PORT: &str = "465";

/// SMTP configuration
///
/// Every value stays raw here so the server starts without them;
/// [`RelaySettings::resolve`] checks them for each delivery.
#[derive(Clone, PartialEq, Eq, Parser)]
pub struct SmtpSettings {
    /// The SMTP host
    #[arg(long, env = "SMTP_HOST", default_value = DEFAULT_SMTP_HOST)]
    pub smtp_host: String,

    /// The SMTP port
    #[arg(long, env = "SMTP_PORT", default_value = DEFAULT_SMTP_PORT)]
    pub smtp_port: String,

    /// The SMTP username, also used as the sender address
    #[arg(long, env = "SMTP_USER")]
    pub smtp_user: Option<String>,

    /// The SMTP password
    #[arg(long, env = "SMTP_PASS", hide_env_values = true)]
    pub smtp_pass: Option<String>,

    /// The address contact requests are delivered to
    #[arg(long, env = "RECIPIENT_EMAIL")]
    pub recipient_email: Option<String>,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_pass", &self.smtp_pass.as_ref().map(|_| "********"))
            .field("recipient_email", &self.recipient_email)
            .finish()
    }
}

impl RelaySettings for SmtpSettings {
    /// Empty values count as missing.
    fn resolve(&self) -> Result<SmtpConfig, ConfigurationError> {
        let user = present(&self.smtp_user);
        let password = present(&self.smtp_pass);
        let recipient = present(&self.recipient_email);

        let (Some(user), Some(password), Some(recipient)) = (user, password, recipient) else {
            let missing = [
                ("SMTP_USER", user),
                ("SMTP_PASS", password),
                ("RECIPIENT_EMAIL", recipient),
            ]
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name)
            .collect();

            return Err(ConfigurationError::NotConfigured { missing });
        };

        let port = self.smtp_port.trim().parse::<u16>().map_err(|_| {
            ConfigurationError::InvalidPort {
                value: self.smtp_port.clone(),
            }
        })?;

        Ok(SmtpConfig::new(
            &self.smtp_host,
            port,
            user,
            password,
            recipient,
        ))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// SMTP mailer
///
/// Holds no connection of its own; every [`Mailer::send_email`] call builds a
/// fresh transport for the [`SmtpConfig`] it is given.
#[derive(Debug, Default, Clone)]
pub struct SmtpMailer;

impl SmtpMailer {
    /// Create a new SMTP mailer
    pub fn new() -> Self {
        Self
    }

    /// Builds a transport for `config`.
    ///
    /// Secure connections use TLS from the first byte. Anything else starts in
    /// plain text and upgrades with STARTTLS when the server offers it.
    pub fn transport(
        &self,
        config: &SmtpConfig,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailerError> {
        let creds = Credentials::new(config.user.clone(), config.password.clone());

        let relay = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .tls(Tls::Opportunistic(TlsParameters::new(config.host.clone())?))
        };

        Ok(relay.port(config.port).credentials(creds).build())
    }
}

/// Assembles the MIME message, returning it with the `Message-ID` it carries
fn build_email(message: &Message) -> Result<(Email, String), MailerError> {
    let from_address: Address = message.from.address.parse()?;
    let message_id = format!("<{}@{}>", Uuid::new_v4(), from_address.domain());

    let email = Email::builder()
        .message_id(Some(message_id.clone()))
        .from(Mailbox::new(Some(message.from.name.clone()), from_address))
        .to(message.to.parse()?)
        .subject(message.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            message.plain_body.clone(),
            message.html_body.clone(),
        ))?;

    Ok((email, message_id))
}

fn describe(response: &Response) -> String {
    format!(
        "{} {}",
        response.code(),
        response.message().collect::<Vec<_>>().join(" ")
    )
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_email(
        &self,
        config: &SmtpConfig,
        message: &Message,
    ) -> Result<Receipt, MailerError> {
        let (email, message_id) = build_email(message)?;

        debug!(host = %config.host, port = config.port, secure = config.secure, "connecting to SMTP relay");

        let response = self.transport(config)?.send(email).await?;

        Ok(Receipt {
            message_id: Some(message_id),
            response: describe(&response),
        })
    }
}
