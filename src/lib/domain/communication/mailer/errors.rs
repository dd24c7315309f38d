//! Mailer errors

use lettre::{address::AddressError, transport::smtp};
use thiserror::Error;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// The sender or recipient could not be parsed as an address
    #[error("Invalid email address: {0}")]
    InvalidAddress(#[from] AddressError),

    /// The message could not be assembled
    #[error(transparent)]
    Message(#[from] lettre::error::Error),

    /// The relay could not be reached, refused our credentials or rejected the message
    #[error(transparent)]
    Transport(#[from] smtp::Error),

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}
