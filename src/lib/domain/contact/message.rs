//! Contact request email

use crate::domain::communication::{
    mailer::{Message, Sender},
    smtp::SmtpConfig,
};

use super::{html::escape_html, Submission};

/// Subject of every contact request email
pub const SUBJECT: &str = "Запрос коммерческого предложения";

/// Display name the email is sent under
pub const SENDER_NAME: &str = "Сайт УРАЛПРОМТ";

/// Contact request email
#[derive(Debug)]
pub struct ContactRequestEmail<'a> {
    submission: &'a Submission,
}

impl<'a> ContactRequestEmail<'a> {
    /// Creates a new `ContactRequestEmail`
    pub fn new(submission: &'a Submission) -> Self {
        Self { submission }
    }

    /// Renders the plain text version of the email. Fields are not escaped.
    pub fn render_plain(&self) -> String {
        format!(
            "Имя: {name}\nТелефон: {phone}\nСообщение:\n{message}",
            name = self.submission.name(),
            phone = self.submission.phone(),
            message = self.submission.message(),
        )
    }

    /// Renders the HTML version of the email
    pub fn render_html(&self) -> String {
        let message = escape_html(self.submission.message()).replace('\n', "<br/>");

        format!(
            "<p><strong>Имя:</strong> {name}</p>\n\
             <p><strong>Телефон:</strong> {phone}</p>\n\
             <p><strong>Сообщение:</strong><br/>{message}</p>",
            name = escape_html(self.submission.name()),
            phone = escape_html(self.submission.phone()),
        )
    }

    /// Addresses the email from the SMTP user to the configured recipient
    pub fn to_message(&self, config: &SmtpConfig) -> Message {
        Message {
            to: config.recipient.clone(),
            from: Sender {
                name: SENDER_NAME.to_string(),
                address: config.user.clone(),
            },
            subject: SUBJECT.to_string(),
            html_body: self.render_html(),
            plain_body: self.render_plain(),
        }
    }
}
