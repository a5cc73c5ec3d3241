//! JSON codec for the preamp WebSocket protocol.
//!
//! Wire format: one UTF-8 JSON object per WebSocket text frame.  There is no
//! envelope, version field or sequence number; the device firmware parses
//! each frame on its own.

use thiserror::Error;

use crate::protocol::messages::{Command, DeviceState};

/// Errors that can occur while encoding or decoding protocol frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame was not valid JSON or did not match the expected shape
    /// (missing field, wrong type, unknown control key, …).
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Remote → Device ───────────────────────────────────────────────────────────

/// Encodes a [`Command`] into the text frame sent to the device.
///
/// # Errors
///
/// Returns [`ProtocolError`] if serialization fails.
///
/// # Examples
///
/// ```rust
/// use preamp_core::{encode_command, Control};
///
/// let text = encode_command(&Control::Volup.toggle()).unwrap();
/// assert_eq!(text, r#"{"Volup":"toggle"}"#);
/// ```
pub fn encode_command(command: &Command) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(command)?)
}

/// Decodes a command frame as the device would receive it.
///
/// # Errors
///
/// Returns [`ProtocolError`] if the frame is not an object with exactly one
/// known control key mapped to `"toggle"`.
pub fn decode_command(payload: &str) -> Result<Command, ProtocolError> {
    Ok(serde_json::from_str(payload)?)
}

// ── Device → Remote ───────────────────────────────────────────────────────────

/// Decodes a state snapshot pushed by the device.
///
/// # Errors
///
/// Returns [`ProtocolError`] if the frame is not valid JSON or the `source`
/// or `volume` field is missing or not a string or number.  The `mute` field
/// never fails decoding; see [`MuteState`](crate::MuteState).
///
/// # Examples
///
/// ```rust
/// use preamp_core::{decode_state, MuteState};
///
/// let state = decode_state(r#"{"source":"CD","volume":-120,"mute":"off"}"#).unwrap();
/// assert_eq!(state.source.as_str(), "CD");
/// assert_eq!(state.volume.as_str(), "-120");
/// assert_eq!(state.mute, MuteState::Off);
/// ```
pub fn decode_state(payload: &str) -> Result<DeviceState, ProtocolError> {
    let state: DeviceState = serde_json::from_str(payload)?;
    tracing::trace!(?state, "decoded device state");
    Ok(state)
}

/// Encodes a state snapshot the way the device publishes it.
///
/// # Errors
///
/// Returns [`ProtocolError`] if serialization fails.
pub fn encode_state(state: &DeviceState) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(state)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
