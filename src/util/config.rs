//! Configuration file support for fpkg-layer.
//!
//! fpkg-layer reads two configuration file locations:
//! - Global: `~/.fpkg-layer/config.toml` - User-wide defaults
//! - Project: `.fpkg-layer/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. The listener port can
//! additionally be forced with the `FPKG_LAYER_PORT` environment variable,
//! which beats every file and flag.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sources::GithubLayout;

/// Environment variable overriding the listener's base port.
pub const PORT_ENV: &str = "FPKG_LAYER_PORT";

/// Base port used when nothing else is configured.
pub const DEFAULT_PORT: u16 = 7348;

/// Request worker threads used when nothing else is configured.
pub const DEFAULT_THREADS: usize = 4;

/// fpkg-layer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listener settings
    pub server: ServerConfig,

    /// Upstream host settings
    pub github: GithubConfig,
}

/// Listener-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base port to bind; 0 asks the OS for a free port
    pub port: Option<u16>,

    /// Number of request worker threads
    pub threads: Option<usize>,
}

/// Upstream-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Web root of the release host (e.g., a mirror)
    pub base_url: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.server.port.is_some() {
            self.server.port = other.server.port;
        }
        if other.server.threads.is_some() {
            self.server.threads = other.server.threads;
        }
        if other.github.base_url.is_some() {
            self.github.base_url = other.github.base_url;
        }
    }

    /// Base port for the listener: `FPKG_LAYER_PORT`, then `server.port`,
    /// then [`DEFAULT_PORT`].
    pub fn base_port(&self) -> Result<u16> {
        let env = std::env::var(PORT_ENV).ok();
        resolve_port(env.as_deref(), self.server.port)
    }

    /// Number of request worker threads (at least one).
    pub fn threads(&self) -> usize {
        self.server.threads.unwrap_or(DEFAULT_THREADS).max(1)
    }

    /// URL layout of the release host.
    pub fn github_layout(&self) -> Result<GithubLayout> {
        match self.github.base_url {
            Some(ref base) => GithubLayout::parse(base),
            None => Ok(GithubLayout::default()),
        }
    }
}

/// Pick the base port from an environment value and a configured value.
pub fn resolve_port(env_value: Option<&str>, configured: Option<u16>) -> Result<u16> {
    if let Some(raw) = env_value {
        let raw = raw.trim();
        if !raw.is_empty() {
            return raw
                .parse()
                .with_context(|| format!("invalid {} value: `{}`", PORT_ENV, raw));
        }
    }

    Ok(configured.unwrap_or(DEFAULT_PORT))
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.fpkg-layer/config.toml)
/// 2. Global config (~/.fpkg-layer/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config directory (~/.fpkg-layer).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".fpkg-layer"))
}

/// Get the global config path (~/.fpkg-layer/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.fpkg-layer/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".fpkg-layer").join("config.toml")
}
