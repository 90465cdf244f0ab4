// src/infrastructure/config.rs
use crate::constants::{DEFAULT_BASE_URL, DEFAULT_PER_PAGE, DEFAULT_TIMEOUT_SECS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_BASE_URL: &str = "NOTEHUB_BASE_URL";
pub const ENV_TOKEN: &str = "NOTEHUB_TOKEN";
pub const ENV_PER_PAGE: &str = "NOTEHUB_PER_PAGE";

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_per_page() -> u32 { DEFAULT_PER_PAGE }
fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT_SECS }

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            per_page: default_per_page(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        let mut config: Config = toml::from_str(&content)
            .context("Failed to parse TOML config")?;
        if config.per_page == 0 {
            config.per_page = DEFAULT_PER_PAGE;
        }

        Ok(config)
    }

    /// `$XDG_CONFIG_HOME/notehub/config.toml` or the platform equivalent.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("notehub").join("config.toml"))
    }

    /// Overlay values found through `lookup` (normally the process environment).
    /// A per-page value that is not a positive integer falls back to the default.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = base_url.trim().to_string();
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            let token = token.trim().to_string();
            self.token = (!token.is_empty()).then_some(token);
        }
        if let Some(per_page) = lookup(ENV_PER_PAGE) {
            self.per_page = per_page
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_PER_PAGE);
        }
    }

    /// Build the startup configuration: file (explicit, else the default location
    /// when present), then `.env` and environment, then the base URL flag.
    pub fn resolve(path: Option<&Path>, base_url: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => {
                    debug!(?path, "Using default config file");
                    Self::load(path)?
                }
                None => Self::default(),
            },
        };

        if let Ok(dotenv) = dotenvy::dotenv() {
            debug!(?dotenv, "Loaded .env");
        }
        config.apply_env(|key| std::env::var(key).ok());

        if let Some(base_url) = base_url {
            config.base_url = base_url.to_string();
        }
        debug!(base_url = %config.base_url, per_page = config.per_page, "Resolved configuration");
        Ok(config)
    }
}
