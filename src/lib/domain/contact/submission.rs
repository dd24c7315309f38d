//! Contact-form submission

use serde_json::{Map, Value};

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Rendered in place of any field the visitor left out
pub const PLACEHOLDER: &str = "-";

/// A contact-form submission. Nothing here is validated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Submission {
    /// The visitor's name
    pub name: Option<String>,

    /// The visitor's phone number
    pub phone: Option<String>,

    /// The free-form message
    pub message: Option<String>,
}

impl Submission {
    /// Creates a submission from a request body and its `Content-Type`.
    ///
    /// JSON and URL-encoded form bodies are read; any other body, or one that
    /// does not decode to an object, is an empty submission.
    pub fn from_body(content_type: Option<&str>, body: &[u8]) -> Self {
        let essence = content_type
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase());

        match essence.as_deref() {
            Some(JSON) => Self::from_json(body),
            Some(FORM) => Self::from_form(body),
            _ => Self::default(),
        }
    }

    /// Reads a JSON body. Anything but an object is an empty submission.
    ///
    /// Unknown keys are ignored, `null` counts as absent and non-string values
    /// are kept as their JSON text.
    pub fn from_json(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => Self {
                name: field(&fields, "name"),
                phone: field(&fields, "phone"),
                message: field(&fields, "message"),
            },
            _ => Self::default(),
        }
    }

    /// Reads a URL-encoded form body. The first value of a repeated key wins.
    pub fn from_form(body: &[u8]) -> Self {
        let Ok(pairs) = serde_urlencoded::from_bytes::<Vec<(String, String)>>(body) else {
            return Self::default();
        };

        let value_of = |key: &str| {
            pairs
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.clone())
        };

        Self {
            name: value_of("name"),
            phone: value_of("phone"),
            message: value_of("message"),
        }
    }

    /// The name, or [`PLACEHOLDER`]
    pub fn name(&self) -> &str {
        or_placeholder(&self.name)
    }

    /// The phone number, or [`PLACEHOLDER`]
    pub fn phone(&self) -> &str {
        or_placeholder(&self.phone)
    }

    /// The message, or [`PLACEHOLDER`]
    pub fn message(&self) -> &str {
        or_placeholder(&self.message)
    }
}

fn field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(value) => Some(value.clone()),
        other => Some(other.to_string()),
    }
}

fn or_placeholder(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(PLACEHOLDER)
}
