//! Configuration management for neocypher.
//!
//! Handles loading configuration from TOML files and environment variables,
//! with support for named server connections.

use crate::error::{NeoError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

/// Service root used when nothing else is configured.
pub const DEFAULT_URL: &str = "http://localhost:7474/db/data/";

/// Main configuration structure for neocypher.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Named server connections.
    #[serde(default)]
    pub connections: HashMap<String, ConnectionConfig>,
}

/// Server connection configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Service root URL, e.g. `http://localhost:7474/db/data/`.
    pub url: Option<String>,

    /// Request timeout in seconds; unset means the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ConnectionConfig {
    /// Creates a connection config from a service root URL.
    ///
    /// Format: `http://host:port/db/data/`. A trailing slash is added if
    /// missing.
    pub fn from_connection_string(conn_str: &str) -> Result<Self> {
        Ok(Self {
            url: Some(normalize_url(conn_str)?),
            ..Self::default()
        })
    }

    /// Returns the service root URL, falling back to [`DEFAULT_URL`].
    pub fn url(&self) -> String {
        self.url.clone().unwrap_or_else(|| DEFAULT_URL.to_string())
    }

    /// Returns the request timeout, falling back to the transport default.
    pub fn timeout(&self) -> u64 {
        self.timeout_secs.unwrap_or(crate::transport::DEFAULT_TIMEOUT_SECS)
    }

    /// Merges another config into this one, with the other taking precedence.
    pub fn merge(&mut self, other: &ConnectionConfig) {
        if other.url.is_some() {
            self.url = other.url.clone();
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
    }

    /// Applies environment variables (`NEO4J_URL`, `NEO4J_TIMEOUT`) to
    /// settings that are still unset.
    pub fn apply_env_defaults(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Like [`Self::apply_env_defaults`], reading variables through `lookup`.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.url.is_none() {
            if let Some(raw) = lookup("NEO4J_URL") {
                let url = normalize_url(&raw).map_err(|e| match e {
                    NeoError::Config(msg) => NeoError::config(format!("NEO4J_URL: {msg}")),
                    other => other,
                })?;
                self.url = Some(url);
            }
        }
        if self.timeout_secs.is_none() {
            if let Some(raw) = lookup("NEO4J_TIMEOUT") {
                let secs = raw.trim().parse().map_err(|_| {
                    NeoError::config(format!(
                        "NEO4J_TIMEOUT: '{raw}' is not a number of seconds"
                    ))
                })?;
                self.timeout_secs = Some(secs);
            }
        }
        Ok(())
    }

    /// Returns a display-safe string (no credentials) for log output.
    pub fn display_string(&self) -> String {
        let url = self.url();
        match Url::parse(&url) {
            Ok(mut parsed) => {
                let _ = parsed.set_username("");
                let _ = parsed.set_password(None);
                parsed.to_string()
            }
            Err(_) => url,
        }
    }
}

/// Validates a service root URL and gives it a trailing slash.
fn normalize_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim())
        .map_err(|e| NeoError::config(format!("Invalid URL '{}': {e}", raw)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(NeoError::config(format!(
            "Invalid scheme '{}'. Expected 'http' or 'https'",
            url.scheme()
        )));
    }

    let mut s = url.to_string();
    if !s.ends_with('/') {
        s.push('/');
    }
    Ok(s)
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("neocypher")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| NeoError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| {
            NeoError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })?;

        for (name, conn) in &config.connections {
            if let Some(url) = &conn.url {
                normalize_url(url).map_err(|e| {
                    NeoError::config(format!("connections.{name}: {e}"))
                })?;
            }
        }

        Ok(config)
    }

    /// Gets a named connection, or the default connection if name is None.
    pub fn get_connection(&self, name: Option<&str>) -> Option<&ConnectionConfig> {
        let key = name.unwrap_or("default");
        self.connections.get(key)
    }
}
