//! Optional TOML settings file.
//!
//! The file is only read when a path is given (`--config` / `PREAMP_CONFIG`).
//! Every field has a serde default, so a partial file, or an empty one, is
//! valid:
//!
//! ```toml
//! log_level = "debug"
//!
//! [device]
//! host = "192.168.1.40"
//!
//! [connection]
//! reconnect_delay_ms = 2000
//! ```
//!
//! Command-line flags and environment variables override whatever the file
//! says; see `main.rs`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::config::{RemoteConfig, DEFAULT_DEVICE_HOST, DEFAULT_RECONNECT_DELAY};

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file could not be read.
    #[error("I/O error reading settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Settings schema ───────────────────────────────────────────────────────────

/// Top-level settings file contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteSettings {
    /// `tracing` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub device: DeviceSettings,
    #[serde(default)]
    pub connection: ConnectionSettings,
}

/// Where the device lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceSettings {
    /// `host` or `host:port` of the device's control socket.
    #[serde(default = "default_host")]
    pub host: String,
}

/// Reconnect behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionSettings {
    /// Wait after every closure before the next attempt, in milliseconds.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_host() -> String {
    DEFAULT_DEVICE_HOST.to_string()
}
fn default_reconnect_delay_ms() -> u64 {
    DEFAULT_RECONNECT_DELAY.as_millis() as u64
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            device: DeviceSettings::default(),
            connection: ConnectionSettings::default(),
        }
    }
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
        }
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

impl RemoteSettings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] if the TOML is malformed or a field
    /// has the wrong type.
    pub fn from_toml(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    /// Converts the file representation into the runtime [`RemoteConfig`].
    pub fn to_config(&self) -> RemoteConfig {
        RemoteConfig {
            device_host: self.device.host.clone(),
            reconnect_delay: Duration::from_millis(self.connection.reconnect_delay_ms),
        }
    }
}

/// Loads settings from `path`.
///
/// Unlike an implicit per-user config file, an explicitly named file must
/// exist.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] if the file cannot be read and
/// [`SettingsError::Parse`] if its content is not valid settings TOML.
pub fn load_settings(path: &Path) -> Result<RemoteSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    RemoteSettings::from_toml(&content)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
