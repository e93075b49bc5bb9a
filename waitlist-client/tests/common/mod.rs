//! In-process stand-in for the waitlist backend

#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use waitlist_client::{
    ApiRequest, ApiResponse, CredentialStore, MemoryStore, SessionManager, Transport, TransportError, UserPager,
};

pub const PAGE_SIZE: usize = 50;

struct SeededAdmin {
    password: String,
    identity: Value,
}

#[derive(Default)]
struct BackendState {
    admins: HashMap<String, SeededAdmin>,
    users: Vec<Value>,
    tokens: HashMap<String, String>,
    issued: u64,
    fail_next: usize,
    log: Vec<String>,
}

/// Emulates the admin endpoints over a seeded in-memory dataset
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<BackendState>,
    held: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    revoked: Mutex<HashSet<String>>,
}

impl FakeBackend {
    /// Backend with the seeded `admin`/`admin123` superadmin and `users` users
    pub fn seeded(users: usize) -> Arc<Self> {
        let backend = Self::default();
        {
            let mut state = backend.state.lock().unwrap();
            state.admins.insert(
                "admin".to_string(),
                SeededAdmin {
                    password: "admin123".to_string(),
                    identity: json!({
                        "id": "6650aa01",
                        "email": "admin@example.com",
                        "username": "admin",
                        "full_name": "Site Admin",
                        "role": "superadmin",
                        "permissions": [],
                        "created_at": "2025-01-01T00:00:00",
                        "updated_at": "2025-01-01T00:00:00"
                    }),
                },
            );
            state.users = (0..users)
                .map(|i| {
                    json!({
                        "id": format!("u{:04}", i),
                        "email": format!("member{:04}@example.com", i),
                        "display_name": format!("Member {}", i),
                        "created_at": "2025-02-10T08:30:00",
                        "updated_at": "2025-02-10T08:30:00",
                        "deleted_at": null,
                        "preferences": {},
                        "last_login": null
                    })
                })
                .collect();
        }
        Arc::new(backend)
    }

    /// Make the next `n` requests fail at the network level
    pub fn fail_next(&self, n: usize) {
        self.state.lock().unwrap().fail_next = n;
    }

    /// Invalidate every issued token, as a server-side expiry would
    pub fn revoke_all(&self) {
        let state = self.state.lock().unwrap();
        let mut revoked = self.revoked.lock().unwrap();
        revoked.extend(state.tokens.keys().cloned());
    }

    /// Hold the response to the next request for `path` until the returned
    /// sender fires
    pub fn hold(&self, path: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.held.lock().unwrap().insert(path.to_string(), rx);
        tx
    }

    /// `METHOD path` of every request that reached the backend
    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    fn authorize(&self, request: &ApiRequest) -> Result<Value, ApiResponse> {
        let rejected = || {
            ApiResponse::new(401, json!({"detail": "Could not validate admin credentials"}).to_string())
        };

        let token = request.bearer_token().ok_or_else(rejected)?;
        if self.revoked.lock().unwrap().contains(token) {
            return Err(rejected());
        }

        let state = self.state.lock().unwrap();
        let username = state.tokens.get(token).ok_or_else(rejected)?;
        let admin = state.admins.get(username).ok_or_else(rejected)?;
        Ok(admin.identity.clone())
    }

    fn route(&self, request: &ApiRequest) -> ApiResponse {
        let path = request.path.as_str();

        if request.method == Method::POST && path == "/api/admin/auth/login" {
            return self.login(request);
        }

        let identity = match self.authorize(request) {
            Ok(identity) => identity,
            Err(response) => return response,
        };

        if request.method != Method::GET {
            return ApiResponse::new(405, json!({"detail": "Method Not Allowed"}).to_string());
        }

        match path {
            "/api/admin/auth/me" => ApiResponse::new(200, identity.to_string()),
            "/api/admin/users/count" => {
                let state = self.state.lock().unwrap();
                ApiResponse::new(
                    200,
                    json!({"total_users": state.users.len(), "users_last_24h": 3}).to_string(),
                )
            }
            p if p.starts_with("/api/admin/users/") => {
                match p.trim_start_matches("/api/admin/users/").parse::<i64>() {
                    Ok(page) => self.users_page(page),
                    Err(_) => ApiResponse::new(
                        422,
                        json!({"detail": [{"msg": "value is not a valid integer"}]}).to_string(),
                    ),
                }
            }
            _ => ApiResponse::new(404, json!({"detail": "Not Found"}).to_string()),
        }
    }

    fn login(&self, request: &ApiRequest) -> ApiResponse {
        let body = request.body.clone().unwrap_or(Value::Null);
        let username = body["username"].as_str().unwrap_or_default().to_string();
        let password = body["password"].as_str().unwrap_or_default();

        let mut state = self.state.lock().unwrap();
        let identity = match state.admins.get(&username) {
            Some(admin) if admin.password == password => admin.identity.clone(),
            _ => {
                return ApiResponse::new(
                    401,
                    json!({"detail": "Incorrect username or password"}).to_string(),
                )
            }
        };

        state.issued += 1;
        let token = format!("token-{}", state.issued);
        state.tokens.insert(token.clone(), username);

        ApiResponse::new(
            200,
            json!({
                "access_token": token,
                "token_type": "bearer",
                "expires_in": 28800,
                "admin": identity
            })
            .to_string(),
        )
    }

    fn users_page(&self, page: i64) -> ApiResponse {
        if page < 1 {
            return ApiResponse::new(400, json!({"detail": "Page number must be greater than 0"}).to_string());
        }

        let state = self.state.lock().unwrap();
        let skip = (page as usize - 1) * PAGE_SIZE;
        let users: Vec<Value> = state.users.iter().skip(skip).take(PAGE_SIZE).cloned().collect();
        let is_last_page = skip + users.len() >= state.users.len();

        ApiResponse::new(
            200,
            json!({
                "users": users,
                "page": page,
                "page_size": PAGE_SIZE,
                "total_users": state.users.len(),
                "is_last_page": is_last_page
            })
            .to_string(),
        )
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        {
            let mut state = self.state.lock().unwrap();
            if state.fail_next > 0 {
                state.fail_next -= 1;
                return Err(TransportError::Unreachable("connection refused".to_string()));
            }
            state.log.push(format!("{} {}", request.method, request.path));
        }

        let held = self.held.lock().unwrap().remove(&request.path);
        if let Some(rx) = held {
            let _ = rx.await;
        }

        Ok(self.route(&request))
    }
}

/// Session manager and pager wired to `backend` with an in-memory store
pub fn wire(backend: &Arc<FakeBackend>) -> (Arc<SessionManager>, UserPager) {
    wire_with_store(backend, Arc::new(MemoryStore::new()))
}

pub fn wire_with_store(
    backend: &Arc<FakeBackend>,
    store: Arc<dyn CredentialStore>,
) -> (Arc<SessionManager>, UserPager) {
    let session = Arc::new(SessionManager::new(backend.clone(), store));
    let pager = UserPager::new(session.clone());
    (session, pager)
}
