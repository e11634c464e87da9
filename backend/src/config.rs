//! Server configuration.
//!
//! Loaded from an optional TOML file (path in `SERVER_CONFIG`, or
//! `server.toml` in the working directory), then overridden by the `HOST` and
//! `PORT` environment variables.
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8080
//!
//! [auth]
//! enabled = true
//!
//! [[auth.api_keys]]
//! key = "s3cr3t"
//! name = "dashboard"
//! permissions = ["list_queries"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use subtle::ConstantTimeEq;

/// Default location of the server configuration file.
pub const DEFAULT_SERVER_CONFIG: &str = "server.toml";

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub auth: AuthSettings,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            auth: AuthSettings::default(),
        }
    }
}

/// API key authentication settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Unset means enabled exactly when at least one key is configured.
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub api_keys: Vec<ApiKeySettings>,
}

/// One API key and the permissions it grants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeySettings {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl AuthSettings {
    /// Authentication turned off: every caller holds every permission.
    pub fn disabled() -> Self {
        Self {
            enabled: Some(false),
            api_keys: Vec::new(),
        }
    }

    /// Authentication on, with the given keys.
    pub fn with_keys(api_keys: Vec<ApiKeySettings>) -> Self {
        Self {
            enabled: Some(true),
            api_keys,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(!self.api_keys.is_empty())
    }

    /// Look up a configured key.
    pub fn find_key(&self, key: &str) -> Option<&ApiKeySettings> {
        // Constant-time per candidate; the match position still leaks.
        self.api_keys
            .iter()
            .find(|k| bool::from(k.key.as_bytes().ct_eq(key.as_bytes())))
    }
}

impl ApiKeySettings {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }
}

impl ServerConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse server config")
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read server config {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration the way the server binary does.
    ///
    /// An explicit `SERVER_CONFIG` path must exist; the default
    /// `server.toml` is optional.
    pub fn load() -> Result<Self> {
        let mut config = match env::var("SERVER_CONFIG") {
            Ok(path) if !path.is_empty() => Self::from_file(path)?,
            _ if Path::new(DEFAULT_SERVER_CONFIG).exists() => {
                Self::from_file(DEFAULT_SERVER_CONFIG)?
            }
            _ => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `HOST` and `PORT` from the environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = env::var("HOST") {
            self.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", port))?;
        }
        Ok(())
    }

    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
