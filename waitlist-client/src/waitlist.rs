//! Public waitlist signup (unauthenticated)

use crate::error::{ClientError, Result};
use crate::transport::{ApiRequest, Transport};
use std::sync::Arc;
use tracing::info;
use waitlist_common::waitlist::{WaitlistEntry, WaitlistRequest, WaitlistResponse};

pub const WAITLIST_PATH: &str = "/api/waitlist";

pub struct WaitlistClient {
    transport: Arc<dyn Transport>,
}

impl WaitlistClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Add an email (and optional name) to the waitlist
    pub async fn join(&self, email: &str, name: Option<String>) -> Result<WaitlistEntry> {
        let body = WaitlistRequest::new(email, name);
        body.validate()?;

        let request = ApiRequest::post(WAITLIST_PATH).with_json(&body)?;
        let response = self.transport.send(request).await?;

        if (400..500).contains(&response.status) {
            return Err(ClientError::Validation(response.describe()));
        }
        if !response.is_success() {
            return Err(ClientError::Transport(response.describe()));
        }

        let parsed: WaitlistResponse = response
            .json()
            .map_err(|e| ClientError::Transport(format!("malformed waitlist response: {}", e)))?;

        info!(id = %parsed.data.id, "waitlist entry created");
        Ok(parsed.data)
    }
}
