//! # preamp-core
//!
//! Shared wire protocol for the preamplifier remote control.
//!
//! The preamp controller (an ESP32 board driving the volume chip and the
//! source relays) exposes a WebSocket at `ws://<device>/ws`.  Both directions
//! carry small UTF-8 JSON objects:
//!
//! - **Remote → device**: one single-key object per button press, e.g.
//!   `{"Phono":"toggle"}`.  See [`Command`].
//! - **Device → remote**: a full snapshot of what the front panel shows,
//!   e.g. `{"source":"CD","volume":-120,"mute":"off"}`.  See [`DeviceState`].
//!
//! This crate has no I/O.  The `preamp-remote` crate owns the socket, the
//! reconnect loop and the display.

pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `preamp_core::Command` instead of `preamp_core::protocol::messages::Command`.
pub use protocol::codec::{decode_command, decode_state, encode_command, encode_state, ProtocolError};
pub use protocol::messages::{Action, Command, Control, DeviceState, DisplayLabel, MuteState};
