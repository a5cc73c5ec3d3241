//! Infrastructure layer for preamp-remote.
//!
//! # Responsibilities
//!
//! - Owning the one WebSocket connection to the device and reopening it
//!   after every closure (`connection_manager`)
//! - Speaking WebSocket through tokio-tungstenite (`ws_transport`)
//! - Reading the optional TOML settings file (`settings`)
//! - The terminal front end: status line on stdout, buttons from stdin
//!   (`terminal`)
//!
//! # What does NOT belong here?
//!
//! - The button → command and state → display rules (application layer)
//! - Message type definitions (`preamp-core`)

pub mod connection_manager;
pub mod settings;
pub mod terminal;
pub mod ws_transport;

pub use connection_manager::{
    ConnectionError, ConnectionHandle, ConnectionManager, Connector, Link,
};
pub use settings::{load_settings, RemoteSettings, SettingsError};
pub use terminal::{
    button_help, parse_button, read_buttons, spawn_button_reader, Panel, TerminalDisplay,
};
pub use ws_transport::TungsteniteConnector;
