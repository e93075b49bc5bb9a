//! Admin session manager
//!
//! Owns the admin credential: acquires it via login, persists it through a
//! [`CredentialStore`], attaches it to protected requests, and drops it on
//! logout or when the server rejects it. Other components receive the
//! manager as an `Arc` and route protected calls through
//! [`SessionManager::send_authorized`].

use crate::error::{ClientError, Result};
use crate::store::{Credential, CredentialStore};
use crate::transport::{ApiRequest, ApiResponse, Transport};
use std::sync::Arc;
use tracing::{debug, info, warn};
use waitlist_common::auth::{AdminIdentity, LoginRequest, LoginResponse};

pub const LOGIN_PATH: &str = "/api/admin/auth/login";
pub const ME_PATH: &str = "/api/admin/auth/me";

/// Outcome of the entry check every protected view performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionGate {
    Authenticated(Credential),
    LoginRequired,
}

pub struct SessionManager {
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn CredentialStore>) -> Self {
        Self { transport, store }
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Exchange username and password for a credential and store it.
    ///
    /// On failure the stored credential, if any, is left as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<Credential> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let request = ApiRequest::post(LOGIN_PATH)
            .with_json(&body)
            .map_err(|_| ClientError::authentication(None))?;

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%username, error = %e, "login request failed");
                return Err(ClientError::authentication(None));
            }
        };

        if !response.is_success() {
            warn!(%username, status = response.status, "login rejected");
            return Err(ClientError::authentication(response.detail()));
        }

        let parsed: LoginResponse = response.json().map_err(|e| {
            warn!(error = %e, "malformed login response");
            ClientError::authentication(None)
        })?;

        let credential = Credential::new(parsed.access_token, parsed.admin);
        self.store.save(&credential)?;

        info!(
            username = %credential.admin.username,
            role = %credential.admin.role,
            "admin signed in"
        );
        Ok(credential)
    }

    /// Stored credential, without asking the server whether it is still valid
    pub fn current_credential(&self) -> Option<Credential> {
        match self.store.load() {
            Ok(credential) => credential,
            Err(e) => {
                warn!(error = %e, "failed to read credential store");
                None
            }
        }
    }

    /// Decide between the login prompt and protected content
    pub fn gate(&self) -> SessionGate {
        match self.current_credential() {
            Some(credential) => SessionGate::Authenticated(credential),
            None => SessionGate::LoginRequired,
        }
    }

    /// Add the bearer token to `request` if a credential is present.
    /// Returns whether the request now carries a token.
    pub fn attach_auth(&self, request: &mut ApiRequest) -> bool {
        let Some(credential) = self.current_credential() else {
            return false;
        };

        if request.set_bearer(&credential.token) {
            true
        } else {
            warn!("stored token cannot be sent as a header");
            false
        }
    }

    /// Send a request to a protected endpoint.
    ///
    /// Nothing is sent without a usable credential. A stored token that
    /// cannot be sent, or a 401/403 answer, clears the credential and yields
    /// [`ClientError::SessionExpired`]; other statuses are returned to the
    /// caller untouched.
    pub async fn send_authorized(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        let Some(credential) = self.current_credential() else {
            debug!(path = %request.path, "no credential, refusing protected call");
            return Err(ClientError::SessionExpired);
        };

        if !request.set_bearer(&credential.token) {
            warn!(path = %request.path, "stored token cannot be sent as a header, discarding it");
            self.expire(&credential.token);
            return Err(ClientError::SessionExpired);
        }

        let path = request.path.clone();
        let response = self.transport.send(request).await?;

        if response.is_auth_rejection() {
            warn!(%path, status = response.status, "credential rejected");
            self.expire(&credential.token);
            return Err(ClientError::SessionExpired);
        }

        Ok(response)
    }

    /// Ask the server who the current credential belongs to
    pub async fn verify_session(&self) -> Result<AdminIdentity> {
        let response = self.send_authorized(ApiRequest::get(ME_PATH)).await?;

        if !response.is_success() {
            return Err(ClientError::Transport(response.describe()));
        }

        response
            .json::<AdminIdentity>()
            .map_err(|e| ClientError::Transport(format!("malformed identity: {}", e)))
    }

    /// Drop the credential. Never fails.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear credential store");
        }
        info!("admin signed out");
    }

    /// Clear the credential after a rejection, unless it has already been
    /// replaced by a newer login
    fn expire(&self, rejected_token: &str) {
        match self.store.clear_if_token(rejected_token) {
            Ok(true) => info!("expired credential cleared"),
            Ok(false) => debug!("rejected token already superseded, keeping current session"),
            Err(e) => warn!(error = %e, "failed to clear expired credential"),
        }
    }
}
