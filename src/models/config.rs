//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ResourceType;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub client: ClientConfig,

    /// What to snapshot and which artifacts to produce
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.client.user_agent.trim().is_empty() {
            return Err(AppError::validation("client.user_agent is empty"));
        }
        if self.client.timeout_secs == Some(0) {
            return Err(AppError::validation("client.timeout_secs must be > 0"));
        }
        if self.client.page_size == 0 {
            return Err(AppError::validation("client.page_size must be > 0"));
        }
        self.client.header_map()?;

        if self.snapshot.resource_types.is_empty() {
            return Err(AppError::validation("No resource types defined"));
        }
        let mut seen = HashSet::new();
        for t in &self.snapshot.resource_types {
            if !seen.insert(t) {
                return Err(AppError::validation(format!(
                    "resource type {t} listed more than once"
                )));
            }
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds. Unset waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Value of the `_count` search parameter
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Follow `next` links instead of reading only the first page
    #[serde(default)]
    pub follow_next: bool,

    /// Extra request headers as `Name: value`
    #[serde(default)]
    pub headers: Vec<String>,
}

impl ClientConfig {
    /// Parse the configured extra headers.
    pub fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for raw in &self.headers {
            let (name, value) = raw.split_once(':').ok_or_else(|| {
                AppError::validation(format!("header '{raw}' is not of the form 'Name: value'"))
            })?;
            let name = HeaderName::from_bytes(name.trim().as_bytes())
                .map_err(|e| AppError::validation(format!("header '{raw}': {e}")))?;
            let value = HeaderValue::from_str(value.trim())
                .map_err(|e| AppError::validation(format!("header '{raw}': {e}")))?;
            map.append(name, value);
        }
        Ok(map)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: None,
            page_size: defaults::page_size(),
            follow_next: false,
            headers: Vec::new(),
        }
    }
}

/// Snapshot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Resource types to snapshot, in processing order
    #[serde(default = "defaults::resource_types")]
    pub resource_types: Vec<ResourceType>,

    /// Write an HTML view next to each snapshot
    #[serde(default = "defaults::enabled")]
    pub render_html: bool,

    /// Diff against yesterday's snapshot when it exists
    #[serde(default = "defaults::enabled")]
    pub diff: bool,

    /// Context lines around each diff hunk
    #[serde(default = "defaults::diff_context")]
    pub diff_context: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            resource_types: defaults::resource_types(),
            render_html: true,
            diff: true,
            diff_context: defaults::diff_context(),
        }
    }
}

mod defaults {
    use crate::models::ResourceType;

    pub fn user_agent() -> String {
        concat!("termsnap/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn page_size() -> u32 {
        1000
    }
    pub fn resource_types() -> Vec<ResourceType> {
        ResourceType::ALL.to_vec()
    }
    pub fn enabled() -> bool {
        true
    }
    pub fn diff_context() -> usize {
        3
    }
}
