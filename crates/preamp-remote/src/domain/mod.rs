//! Domain layer for preamp-remote.
//!
//! Pure types with no dependencies on sockets, timers or terminals:
//!
//! - Runtime configuration and gateway URL derivation
//! - Connection lifecycle states and the events the connection publishes

pub mod config;
pub mod connection;

pub use config::{ConfigError, RemoteConfig};
pub use connection::{ConnectionEvent, ConnectionState};
