//! Common types shared between the waitlist backend and its admin clients

pub mod auth;
pub mod timestamp;
pub mod users;
pub mod waitlist;

use serde::{Deserialize, Serialize};

/// Errors raised while interpreting wire data
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Error body returned by the backend on non-2xx responses.
///
/// `detail` is a plain string for handled errors and a list of
/// `{ loc, msg, type }` objects for request validation failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Extract a human-readable message from a raw error body, if it has one
    pub fn message_from(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed.message()
    }

    pub fn message(&self) -> Option<String> {
        match &self.detail {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if msgs.is_empty() {
                    None
                } else {
                    Some(msgs.join("; "))
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_string_detail() {
        let msg = ErrorBody::message_from(r#"{"detail":"Incorrect username or password"}"#);
        assert_eq!(msg.as_deref(), Some("Incorrect username or password"));
    }

    #[test]
    fn test_error_body_validation_detail() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address","type":"value_error"}]}"#;
        let msg = ErrorBody::message_from(body);
        assert_eq!(msg.as_deref(), Some("value is not a valid email address"));
    }

    #[test]
    fn test_error_body_without_detail() {
        assert!(ErrorBody::message_from("<html>502 Bad Gateway</html>").is_none());
        assert!(ErrorBody::message_from(r#"{"detail":""}"#).is_none());
        assert!(ErrorBody::message_from(r#"{"detail":null}"#).is_none());
    }
}
