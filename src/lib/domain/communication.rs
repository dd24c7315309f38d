//! Outbound email: the mailer abstraction and its SMTP settings.

pub mod mailer;
pub mod smtp;
