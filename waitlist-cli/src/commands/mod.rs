//! Command handlers

pub mod auth;
pub mod users;
pub mod waitlist;

use crate::config::Config;
use crate::output::OutputFormat;
use anyhow::{Context as _, Result};
use std::sync::Arc;
use std::time::Duration;
use waitlist_client::{Credential, FileStore, HttpTransport, SessionGate, SessionManager, Transport};

/// Everything a command needs: the shared session and how to print
pub struct Context {
    pub session: Arc<SessionManager>,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(config: &Config) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(
            HttpTransport::new(&config.server, Duration::from_secs(config.timeout_secs))
                .context("failed to create HTTP client")?,
        );

        let store_path = match &config.session_file {
            Some(path) => path.into(),
            None => FileStore::default_path().context("cannot locate session file")?,
        };
        let store = Arc::new(FileStore::new(store_path));

        Ok(Self {
            session: Arc::new(SessionManager::new(transport, store)),
            format: OutputFormat::parse(&config.output),
        })
    }

    /// Entry check for protected commands
    pub fn require_session(&self) -> Result<Credential> {
        match self.session.gate() {
            SessionGate::Authenticated(credential) => Ok(credential),
            SessionGate::LoginRequired => {
                anyhow::bail!("Not signed in. Use 'waitlist-admin auth login' first")
            }
        }
    }
}
