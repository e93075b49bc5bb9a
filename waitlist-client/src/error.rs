//! Client error taxonomy and the notices shown for each error

use crate::store::StoreError;
use crate::transport::TransportError;
use thiserror::Error;

/// Fallback when the login endpoint gives no usable message
pub const GENERIC_LOGIN_FAILURE: &str = "Invalid username or password";

#[derive(Error, Debug)]
pub enum ClientError {
    /// Login rejected; user-correctable, shown on the login form
    #[error("{message}")]
    Authentication { message: String },

    /// The server no longer accepts the stored credential
    #[error("Session expired")]
    SessionExpired,

    /// Session expiry surfacing inside a data fetch
    #[error("Not authorized")]
    Authorization,

    /// Data fetch failed; previous data is kept
    #[error("Failed to load data: {0}")]
    Fetch(String),

    /// Network failure or unexpected response outside a data fetch
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Page number must be greater than 0, got {0}")]
    InvalidPage(u32),

    #[error("Credential store error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Validation(String),
}

impl From<TransportError> for ClientError {
    fn from(e: TransportError) -> Self {
        ClientError::Transport(e.to_string())
    }
}

impl From<waitlist_common::Error> for ClientError {
    fn from(e: waitlist_common::Error) -> Self {
        match e {
            waitlist_common::Error::Validation(msg) => ClientError::Validation(msg),
            other => ClientError::Transport(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    pub fn authentication(message: Option<String>) -> Self {
        ClientError::Authentication {
            message: message.unwrap_or_else(|| GENERIC_LOGIN_FAILURE.to_string()),
        }
    }

    /// Whether the caller must drop to the login flow
    pub fn requires_login(&self) -> bool {
        matches!(self, ClientError::SessionExpired | ClientError::Authorization)
    }

    /// User-facing notice for this error
    pub fn notice(&self) -> Notice {
        match self {
            ClientError::SessionExpired | ClientError::Authorization => Notice {
                level: NoticeLevel::Warning,
                title: "Session expired".to_string(),
                message: "Please sign in again".to_string(),
                sign_in_again: true,
                retryable: false,
            },
            ClientError::Authentication { message } => Notice {
                level: NoticeLevel::Error,
                title: "Login failed".to_string(),
                message: message.clone(),
                sign_in_again: false,
                retryable: false,
            },
            ClientError::Fetch(msg) => Notice {
                level: NoticeLevel::Error,
                title: "Failed to load users".to_string(),
                message: msg.clone(),
                sign_in_again: false,
                retryable: true,
            },
            ClientError::Transport(msg) => Notice {
                level: NoticeLevel::Warning,
                title: "Connection problem".to_string(),
                message: msg.clone(),
                sign_in_again: false,
                retryable: true,
            },
            ClientError::InvalidPage(_) | ClientError::Validation(_) => Notice {
                level: NoticeLevel::Error,
                title: "Invalid input".to_string(),
                message: self.to_string(),
                sign_in_again: false,
                retryable: false,
            },
            ClientError::Store(e) => Notice {
                level: NoticeLevel::Error,
                title: "Session storage failed".to_string(),
                message: e.to_string(),
                sign_in_again: false,
                retryable: false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient message for the admin, derived from an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
    /// Redirect to the login flow after showing this
    pub sign_in_again: bool,
    pub retryable: bool,
}
