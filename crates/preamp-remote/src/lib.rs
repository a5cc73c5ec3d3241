//! preamp-remote library crate.
//!
//! A remote control for the ESP32 preamplifier controller.  It keeps one
//! WebSocket open to the device, turns button presses into toggle commands
//! and renders the state snapshots the device pushes back.
//!
//! # Architecture
//!
//! ```text
//! Device (JSON over WebSocket, ws://<host>/ws)
//!         ↕
//! [preamp-remote]
//!   ├── domain/           RemoteConfig, ConnectionState, ConnectionEvent
//!   ├── application/      UiBinder (controls → commands, state → display),
//!   │                     dispatch loop
//!   └── infrastructure/
//!         ├── connection_manager/  single connection + fixed-delay reconnect
//!         ├── ws_transport/        tokio-tungstenite Connector
//!         ├── settings/            TOML settings file
//!         └── terminal/            stdout display, stdin buttons
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `preamp-core`, and talks to the
//!   outside world only through the [`application::DisplaySurface`] and
//!   [`application::CommandSink`] traits.
//! - `infrastructure` implements those traits with real sockets and
//!   terminals.

/// Domain layer: configuration and connection lifecycle types.
pub mod domain;

/// Application layer: the UI binder and the event dispatch loop.
pub mod application;

/// Infrastructure layer: WebSocket connection, settings, terminal front end.
pub mod infrastructure;
