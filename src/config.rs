//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$SMTPCAP_CONFIG` (environment variable)
//! 2. `~/.config/smtpcap/config.toml` (Linux/macOS)
//!    `%APPDATA%\smtpcap\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, Result};
use crate::parser::mime::DEFAULT_MAX_DEPTH;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "SMTPCAP_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Message parsing settings.
    pub parser: ParserConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Hostname stamped into message ids and `Received` headers.
    /// Falls back to the system hostname.
    pub hostname: Option<String>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override the directory used for the log file.
    pub cache_dir: Option<PathBuf>,
}

/// Message parsing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Product name shown in the synthesized `Received` header.
    pub product_id: String,
    /// Deepest multipart nesting that is decomposed into parts.
    pub max_mime_depth: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            hostname: None,
            log_level: "warn".to_string(),
            cache_dir: None,
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            product_id: "smtpcap".to_string(),
            max_mime_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Hostname to capture as: configured value, then the system hostname,
    /// then `localhost`.
    pub fn hostname(&self) -> String {
        if let Some(ref name) = self.general.hostname {
            return name.clone();
        }
        let system = gethostname::gethostname().to_string_lossy().into_owned();
        if system.is_empty() {
            "localhost".to_string()
        } else {
            system
        }
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    let Some(path) = config_file_path() else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }

    match load_config_from(&path) {
        Ok(cfg) => {
            tracing::info!(path = %path.display(), "Loaded config");
            cfg
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    }
}

/// Load configuration from a specific file.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path).map_err(|e| CaptureError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| CaptureError::InvalidConfig {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Save configuration to the standard location, returning where it went.
pub fn save_config(config: &Config) -> anyhow::Result<PathBuf> {
    let path = config_file_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;
    save_config_to(config, &path)?;
    Ok(path)
}

/// Save configuration to a specific file, creating parent directories.
pub fn save_config_to(config: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(())
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(env_path));
    }
    dirs::config_dir().map(|d| d.join("smtpcap").join("config.toml"))
}

/// Return the cache directory used for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("smtpcap")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("smtpcap.log")
}
