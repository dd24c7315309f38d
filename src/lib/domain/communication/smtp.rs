//! SMTP relay configuration

use std::fmt;

use thiserror::Error;

#[cfg(test)]
use mockall::mock;

/// Port on which the relay expects TLS from the first byte
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// Raised when the relay settings cannot be used for a delivery
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// One or more required settings are unset or empty
    #[error("SMTP or recipient not configured")]
    NotConfigured {
        /// The environment variables that were missing
        missing: Vec<&'static str>,
    },

    /// The port is not a number between 0 and 65535
    #[error("Invalid SMTP port: {value:?}")]
    InvalidPort {
        /// The value as configured
        value: String,
    },
}

/// A source of relay settings, resolved once for every delivery
pub trait RelaySettings: Clone + Send + Sync + 'static {
    /// Resolves the settings into a complete [`SmtpConfig`].
    fn resolve(&self) -> Result<SmtpConfig, ConfigurationError>;
}

#[cfg(test)]
mock! {
    pub RelaySettings {}

    impl Clone for RelaySettings {
        fn clone(&self) -> Self;
    }

    impl RelaySettings for RelaySettings {
        fn resolve(&self) -> Result<SmtpConfig, ConfigurationError>;
    }
}

/// A complete set of SMTP settings for a single delivery
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    /// The SMTP host
    pub host: String,

    /// The SMTP port
    pub port: u16,

    /// Whether to use TLS from the start of the connection
    pub secure: bool,

    /// The SMTP username and sender address
    pub user: String,

    /// The SMTP password
    pub password: String,

    /// The recipient's address
    pub recipient: String,
}

impl SmtpConfig {
    /// Creates a config for `host` and `port`; `secure` follows from the port.
    pub fn new(host: &str, port: u16, user: &str, password: &str, recipient: &str) -> Self {
        Self {
            host: host.to_string(),
            port,
            secure: port == IMPLICIT_TLS_PORT,
            user: user.to_string(),
            password: password.to_string(),
            recipient: recipient.to_string(),
        }
    }
}

impl RelaySettings for SmtpConfig {
    fn resolve(&self) -> Result<SmtpConfig, ConfigurationError> {
        Ok(self.clone())
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("user", &self.user)
            .field("password", &"********")
            .field("recipient", &self.recipient)
            .finish()
    }
}
