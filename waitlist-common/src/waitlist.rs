//! Public waitlist signup

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Body of `POST /api/waitlist`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
}

impl WaitlistRequest {
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            name: name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        }
    }

    /// Shallow shape check; the backend does the authoritative validation
    pub fn validate(&self) -> Result<()> {
        let (local, domain) = self
            .email
            .split_once('@')
            .ok_or_else(|| Error::Validation(format!("'{}' is not an email address", self.email)))?;

        if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(Error::Validation(format!(
                "'{}' is not an email address",
                self.email
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistResponse {
    pub success: bool,
    pub message: String,
    pub data: WaitlistEntry,
}
