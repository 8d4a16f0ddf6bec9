use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DdnsError, Result};

/// Options accepted by the authenticator.
///
/// Direct `endpoint`/`token` values take precedence over the credentials file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatorConfig {
    #[serde(default)]
    pub credentials: Option<PathBuf>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
    #[serde(default = "default_propagation_seconds")]
    pub propagation_seconds: u64,
}

pub const DEFAULT_PROPAGATION_SECONDS: u64 = 60;

fn default_propagation_seconds() -> u64 {
    DEFAULT_PROPAGATION_SECONDS
}

impl AuthenticatorConfig {
    pub fn with_credentials_file(path: impl Into<PathBuf>) -> Self {
        Self {
            credentials: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn with_direct(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            token: Some(token.into()),
            ..Default::default()
        }
    }

    pub fn propagation_seconds(mut self, seconds: u64) -> Self {
        self.propagation_seconds = seconds;
        self
    }

    pub fn propagation_delay(&self) -> Duration {
        Duration::from_secs(self.propagation_seconds)
    }

    /// Load from a TOML file, e.g. a section of a host tool's config.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DdnsError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            DdnsError::config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            endpoint: None,
            token: None,
            propagation_seconds: default_propagation_seconds(),
        }
    }
}
