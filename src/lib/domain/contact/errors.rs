//! Contact request errors

use thiserror::Error;

use crate::domain::communication::{mailer::MailerError, smtp::ConfigurationError};

/// Errors that can occur when relaying a contact request
#[derive(Debug, Error)]
pub enum ContactError {
    /// The relay credentials or the recipient are not configured
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The email could not be delivered
    #[error(transparent)]
    Delivery(#[from] MailerError),
}
