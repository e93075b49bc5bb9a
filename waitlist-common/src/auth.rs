//! Admin authentication types

use serde::{Deserialize, Serialize};

/// Role carried by the seeded top-level administrator
pub const ROLE_SUPERADMIN: &str = "superadmin";

/// Identity record of an authenticated administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub id: String,
    pub username: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl AdminIdentity {
    pub fn is_superadmin(&self) -> bool {
        self.role == ROLE_SUPERADMIN
    }

    /// Name to greet the admin with
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub admin: AdminIdentity,
}

fn default_token_type() -> String {
    "bearer".to_string()
}
