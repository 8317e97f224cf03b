//! Configuration file loading and parsing.
//!
//! The tracker supports a `config.toml` at the data root. If no config
//! file exists, the system falls back to sensible defaults. Every section
//! and key is optional; accessors supply the defaults.

use crate::service::DEFAULT_PROJECT;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const CONFIG_FILE: &str = "config.toml";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Root configuration structure loaded from `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackerConfig {
    /// HTTP server configuration (optional).
    pub server: Option<ServerConfig>,
    /// Issue handling configuration (optional).
    pub issues: Option<IssuesConfig>,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the server binds to (default: "0.0.0.0:3000").
    pub bind_addr: Option<String>,
}

/// Issue handling configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuesConfig {
    /// Project name applied by the project-less legacy route
    /// (default: "apitest").
    pub default_project: Option<String>,
}

impl TrackerConfig {
    /// Load configuration from `config.toml` under the given data root.
    ///
    /// Returns defaults when the file does not exist.
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self> {
        let path = root.as_ref().join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// The address the server should bind to.
    pub fn bind_addr(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.bind_addr.clone())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
    }

    /// The project name for requests that omit a project segment.
    pub fn default_project(&self) -> String {
        self.issues
            .as_ref()
            .and_then(|i| i.default_project.clone())
            .unwrap_or_else(|| DEFAULT_PROJECT.to_string())
    }
}
