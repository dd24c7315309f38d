//! Contact-form requests relayed to the sales inbox.

pub mod errors;
pub mod html;
pub mod message;
pub mod service;
pub mod submission;

pub use errors::ContactError;
pub use service::{ContactService, ContactServiceImpl};
pub use submission::Submission;
