//! Email service module

use std::fmt;

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use super::smtp::SmtpConfig;

mod errors;
mod message;

pub use errors::MailerError;
pub use message::{Message, Sender};

/// What the relay reported back for an accepted message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// The `Message-ID` header the message was sent with, if any
    pub message_id: Option<String>,

    /// The raw response returned by the relay
    pub response: String,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message_id {
            Some(id) => write!(f, "{id}"),
            None => write!(f, "{}", self.response),
        }
    }
}

/// Email service
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Send an email
    ///
    /// Implementations open a new connection to the relay described by
    /// `config` for every call and drop it once the message is handed over.
    ///
    /// # Arguments
    /// * `config` - The resolved [`SmtpConfig`] to deliver through.
    /// * `message` - The [`Message`] to send.
    ///
    /// # Returns
    /// A [`Receipt`] on success, or the [`MailerError`] that stopped delivery.
    async fn send_email(
        &self,
        config: &SmtpConfig,
        message: &Message,
    ) -> Result<Receipt, MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send_email(&self, config: &SmtpConfig, message: &Message) -> Result<Receipt, MailerError>;
    }
}
