//! RON configuration for the repricer binary.
//!
//! Every field has a default, so a missing file or a partial file is fine.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use repricer_core::DEFAULT_BATCH_THRESHOLD;
use repricer_engine::{FetchSettings, SheetsSettings, DEFAULT_USER_AGENT};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "repricer.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Identity the console operator's document selection is stored under.
    pub operator: String,
    pub batch_threshold: usize,
    pub log: LogSettings,
    pub fetch: FetchConfig,
    pub store: StoreConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            operator: "console".to_string(),
            batch_threshold: DEFAULT_BATCH_THRESHOLD,
            log: LogSettings::default(),
            fetch: FetchConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogDestination {
    /// Write to ./repricer.log in current directory.
    File,
    /// Write to terminal (stderr/stdout).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub destination: LogDestination,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            destination: LogDestination::File,
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let defaults = FetchSettings::default();
        Self {
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            request_timeout_secs: defaults.request_timeout.as_secs(),
            redirect_limit: defaults.redirect_limit,
            max_bytes: defaults.max_bytes,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub sheets_base_url: String,
    pub drive_base_url: String,
    pub values_range: String,
    /// Environment variable holding the OAuth access token.
    pub access_token_env: String,
    pub request_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let defaults = SheetsSettings::default();
        Self {
            sheets_base_url: defaults.sheets_base_url,
            drive_base_url: defaults.drive_base_url,
            values_range: defaults.values_range,
            access_token_env: "REPRICER_ACCESS_TOKEN".to_string(),
            request_timeout_secs: defaults.request_timeout.as_secs(),
        }
    }
}

impl AppConfig {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()));
            }
        };
        ron::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.fetch.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.fetch.request_timeout_secs.max(1)),
            redirect_limit: self.fetch.redirect_limit,
            max_bytes: self.fetch.max_bytes,
            user_agent: self.fetch.user_agent.clone(),
            ..FetchSettings::default()
        }
    }

    pub fn sheets_settings(&self, access_token: String) -> SheetsSettings {
        SheetsSettings {
            sheets_base_url: self.store.sheets_base_url.clone(),
            drive_base_url: self.store.drive_base_url.clone(),
            values_range: self.store.values_range.clone(),
            access_token,
            request_timeout: Duration::from_secs(self.store.request_timeout_secs.max(1)),
        }
    }
}
