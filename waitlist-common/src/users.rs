//! Administered user records and the paginated listing protocol

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed page size of `/api/admin/users/{page}`; not negotiated by clients
pub const USERS_PAGE_SIZE: usize = 50;

/// A registered site user as seen by the admin panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "crate::timestamp::deserialize_option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::timestamp::deserialize_option")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub preferences: serde_json::Map<String, serde_json::Value>,
    #[serde(default, deserialize_with = "crate::timestamp::deserialize_option")]
    pub last_login: Option<DateTime<Utc>>,
}

impl AdminUser {
    /// Case-insensitive substring match on email or display name.
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.email.to_lowercase().contains(needle)
            || self.display_name.to_lowercase().contains(needle)
    }
}

/// One page of `GET /api/admin/users/{page}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersPage {
    pub users: Vec<AdminUser>,
    pub total_users: u64,
    pub is_last_page: bool,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

/// Body of `GET /api/admin/users/count`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersCount {
    #[serde(default)]
    pub total_users: Option<u64>,
    pub users_last_24h: u64,
}
