//! Email message

/// The sender of an email
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sender {
    /// The display name shown to the recipient
    pub name: String,

    /// The sender's email address
    pub address: String,
}

/// Email message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// The recipient of the email
    pub to: String,

    /// The sender of the email
    pub from: Sender,

    /// The subject of the email
    pub subject: String,

    /// The HTML body of the email
    pub html_body: String,

    /// The plain text body of the email
    pub plain_body: String,
}
