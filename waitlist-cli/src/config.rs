//! CLI configuration management

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: String,
    pub output: String,
    /// Where the admin session is kept; defaults to `~/.config/waitlist/session.toml`
    pub session_file: Option<String>,
    pub timeout_secs: u64,
    pub log_level: String,
    /// Directory for a JSON log file in addition to stderr
    pub log_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: "http://localhost:8000".to_string(),
            output: "table".to_string(),
            session_file: None,
            timeout_secs: 30,
            log_level: "warn".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Apply command-line overrides
    pub fn with_overrides(
        mut self,
        server: Option<String>,
        output: Option<String>,
        log_level: Option<String>,
    ) -> Self {
        if let Some(server) = server {
            self.server = server;
        }
        if let Some(output) = output {
            self.output = output;
        }
        if let Some(level) = log_level {
            self.log_level = level;
        }
        self
    }

    fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")?;
        Ok(PathBuf::from(home).join(".config/waitlist/cli.toml"))
    }
}
