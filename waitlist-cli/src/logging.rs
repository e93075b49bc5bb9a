//! Logging setup
//!
//! Human-readable events go to stderr so they never mix with command output.
//! With a log directory configured, JSON events are also written there.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use std::io;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: Option<String>,
}

impl LoggingConfig {
    /// Install the global subscriber. Keep the returned guard alive until
    /// exit so buffered file output is flushed.
    pub fn init(&self) -> anyhow::Result<Option<WorkerGuard>> {
        // RUST_LOG wins over the configured level
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let console_layer = fmt::layer()
            .with_target(false)
            .with_level(true)
            .with_writer(io::stderr);

        let guard = if let Some(ref dir) = self.log_dir {
            let file_appender = tracing_appender::rolling::never(dir, "waitlist-admin.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .json()
                .with_writer(non_blocking);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()?;
            Some(guard)
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .try_init()?;
            None
        };

        tracing::debug!(level = %self.level, "logging initialized");
        Ok(guard)
    }
}
