//! Scripted transport and store doubles for unit tests

use crate::store::{Credential, CredentialStore, MemoryStore, StoreError};
use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use waitlist_common::auth::AdminIdentity;

/// Replies with queued responses in order and records every request
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse::new(status, body)));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(TransportError::Unreachable(message.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.seen.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Unreachable("no scripted reply".to_string())))
    }
}

/// Store whose writes always fail; reads and clears go to memory
pub struct ReadOnlyStore {
    inner: MemoryStore,
}

impl ReadOnlyStore {
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            inner: MemoryStore::with_credential(credential),
        }
    }
}

impl CredentialStore for ReadOnlyStore {
    fn load(&self) -> Result<Option<Credential>, StoreError> {
        self.inner.load()
    }

    fn save(&self, _credential: &Credential) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only file system",
        )))
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.inner.clear()
    }

    fn clear_if_token(&self, token: &str) -> Result<bool, StoreError> {
        self.inner.clear_if_token(token)
    }
}

pub fn admin() -> AdminIdentity {
    AdminIdentity {
        id: "6650aa".to_string(),
        username: "admin".to_string(),
        role: "superadmin".to_string(),
        email: Some("admin@example.com".to_string()),
        full_name: Some("Site Admin".to_string()),
        permissions: vec![],
    }
}

pub fn credential(token: &str) -> Credential {
    Credential::new(token, admin())
}

pub fn identity_json() -> String {
    serde_json::to_string(&admin()).unwrap()
}

pub fn login_json(token: &str) -> String {
    format!(
        r#"{{"access_token":"{}","token_type":"bearer","expires_in":28800,"admin":{}}}"#,
        token,
        identity_json()
    )
}

/// A users page body with `count` generated users starting at `first`
pub fn users_page_json(first: usize, count: usize, total: u64, is_last_page: bool) -> String {
    let users: Vec<serde_json::Value> = (first..first + count)
        .map(|i| {
            serde_json::json!({
                "id": format!("user-{}", i),
                "email": format!("user{}@example.com", i),
                "display_name": format!("User {}", i),
                "created_at": "2025-02-10T08:30:00",
                "last_login": null
            })
        })
        .collect();

    serde_json::json!({
        "users": users,
        "total_users": total,
        "is_last_page": is_last_page
    })
    .to_string()
}
