//! Contact request service

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::{
    mailer::{Mailer, Receipt},
    smtp::RelaySettings,
};

use super::{message::ContactRequestEmail, ContactError, Submission};

/// Contact request service
#[async_trait]
pub trait ContactService: Clone + Send + Sync + 'static {
    /// Relays a submission to the configured recipient.
    ///
    /// # Arguments
    /// * `submission` - The [`Submission`] to relay.
    ///
    /// # Returns
    /// - [`Ok`] with the relay's [`Receipt`] if the email was accepted.
    /// - [`Err`] with a [`ContactError`] if the relay is not configured or delivery failed.
    async fn submit(&self, submission: &Submission) -> Result<Receipt, ContactError>;
}

#[cfg(test)]
mock! {
    pub ContactService {}

    impl Clone for ContactService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl ContactService for ContactService {
        async fn submit(&self, submission: &Submission) -> Result<Receipt, ContactError>;
    }
}

/// Contact request service implementation
#[derive(Debug, Clone)]
pub struct ContactServiceImpl<M, S>
where
    M: Mailer,
    S: RelaySettings,
{
    settings: S,
    mailer: Arc<M>,
}

impl<M, S> ContactServiceImpl<M, S>
where
    M: Mailer,
    S: RelaySettings,
{
    /// Creates a new contact request service.
    pub fn new(settings: S, mailer: Arc<M>) -> Self {
        Self { settings, mailer }
    }
}

#[async_trait]
impl<M, S> ContactService for ContactServiceImpl<M, S>
where
    M: Mailer,
    S: RelaySettings,
{
    async fn submit(&self, submission: &Submission) -> Result<Receipt, ContactError> {
        let config = match self.settings.resolve() {
            Ok(config) => config,
            Err(err) => {
                error!(?err, "SMTP relay is not usable");

                return Err(err.into());
            }
        };

        let message = ContactRequestEmail::new(submission).to_message(&config);

        match self.mailer.send_email(&config, &message).await {
            Ok(receipt) => {
                info!(message_id = %receipt, "contact request sent");

                Ok(receipt)
            }
            Err(err) => {
                error!(error = %err, "failed to send contact request");

                Err(err.into())
            }
        }
    }
}
