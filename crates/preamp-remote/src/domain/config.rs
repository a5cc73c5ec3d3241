//! Remote configuration types.
//!
//! [`RemoteConfig`] is the single source of truth for runtime settings.  The
//! binary fills it from CLI arguments, environment variables and the optional
//! settings file; tests build it directly.

use std::time::Duration;

use thiserror::Error;

/// Fixed path of the device's control socket.
pub const GATEWAY_PATH: &str = "/ws";

/// mDNS name the controller firmware registers on the LAN.
pub const DEFAULT_DEVICE_HOST: &str = "esp32HiFi.local";

/// Delay between a closure and the next connection attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(2000);

/// Errors produced while validating configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The device host was empty or whitespace.
    #[error("device host must not be empty")]
    EmptyHost,

    /// The device host contained a scheme, path or whitespace.
    ///
    /// Only `host` or `host:port` is accepted; the scheme and the `/ws` path
    /// are fixed.
    #[error("invalid device host '{0}': expected host or host:port")]
    InvalidHost(String),
}

/// All runtime configuration for the remote.
///
/// # Example
///
/// ```rust
/// use preamp_remote::domain::RemoteConfig;
///
/// let cfg = RemoteConfig::default();
/// assert_eq!(cfg.gateway_url().unwrap(), "ws://esp32HiFi.local/ws");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Host (optionally `host:port`) serving the control socket.
    ///
    /// This plays the role the page origin plays for the browser client:
    /// the socket URL is derived from it.
    pub device_host: String,

    /// How long to wait after every closure before connecting again.
    pub reconnect_delay: Duration,
}

impl RemoteConfig {
    /// Derives the WebSocket URL `ws://<device_host>/ws`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the host is empty or is not a bare
    /// `host`/`host:port`.
    pub fn gateway_url(&self) -> Result<String, ConfigError> {
        let host = self.device_host.trim();
        if host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if host.contains("://") || host.contains('/') || host.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidHost(self.device_host.clone()));
        }
        Ok(format!("ws://{host}{GATEWAY_PATH}"))
    }
}

impl Default for RemoteConfig {
    /// | Field           | Default             |
    /// |-----------------|---------------------|
    /// | device_host     | `esp32HiFi.local`   |
    /// | reconnect_delay | 2000 ms             |
    fn default() -> Self {
        Self {
            device_host: DEFAULT_DEVICE_HOST.to_string(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
