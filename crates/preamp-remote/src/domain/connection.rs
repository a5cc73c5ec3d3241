//! Connection lifecycle types.

use std::fmt;

/// Lifecycle state of the single device connection.
///
/// ```text
///            handshake ok            transport closed
/// Connecting ───────────────▶ Open ───────────────────▶ Closed
///     ▲  │                                                 │
///     │  └──────────── handshake failed ──────────────────▶│
///     └──────────────── reconnect delay elapsed ───────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// A handshake with the device is in progress.
    Connecting,
    /// The socket is open; commands are delivered.
    Open,
    /// The socket is gone; a reconnect is scheduled.
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
        })
    }
}

/// Events published by the connection manager to the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The handshake succeeded.
    Opened,
    /// A text frame arrived from the device.
    ///
    /// The payload is passed on undecoded so that a malformed frame only
    /// affects its own handling.
    Message(String),
    /// The connection closed or could not be opened.  A reconnect follows
    /// after the configured delay.
    Closed,
}
