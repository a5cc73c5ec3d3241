//! Message types for the device-facing WebSocket protocol.
//!
//! # Message flow
//!
//! ```text
//! Remote → Device:  Command      →  {"<ControlName>":"toggle"}
//! Device → Remote:  {"source":..,"volume":..,"mute":..}  →  DeviceState
//! ```
//!
//! Commands are stateless pulses.  The device owns the real source, volume
//! and mute state and answers every change with a fresh [`DeviceState`]
//! snapshot, so the remote never has to track anything itself.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── Controls ──────────────────────────────────────────────────────────────────

/// The seven buttons of the remote.
///
/// Each control has two names:
///
/// - an *element id* (`"phono"`, `"volup"`, …) identifying the button on the
///   front end, and
/// - a *wire name* (`"Phono"`, `"Volup"`, `"CD"`, …) used as the single key of
///   the outbound JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    /// Select the phono input.
    Phono,
    /// Select the media input.
    Media,
    /// Select the CD input.
    #[serde(rename = "CD")]
    Cd,
    /// Select the tuner input.
    Tuner,
    /// One volume step down.
    Voldown,
    /// One volume step up.
    Volup,
    /// Toggle the mute relay.
    Mute,
}

impl Control {
    /// Every control, in front-panel order.
    pub const ALL: [Control; 7] = [
        Control::Phono,
        Control::Media,
        Control::Cd,
        Control::Tuner,
        Control::Voldown,
        Control::Volup,
        Control::Mute,
    ];

    /// The four source selectors in the order the firmware numbers them
    /// (source 1 = Phono … source 4 = Tuner).
    pub const SOURCES: [Control; 4] = [Control::Phono, Control::Media, Control::Cd, Control::Tuner];

    /// Identifier of the button element bound to this control.
    pub fn element_id(self) -> &'static str {
        match self {
            Control::Phono => "phono",
            Control::Media => "media",
            Control::Cd => "cd",
            Control::Tuner => "tuner",
            Control::Voldown => "voldown",
            Control::Volup => "volup",
            Control::Mute => "mute",
        }
    }

    /// Key used for this control in the outbound JSON object.
    pub fn wire_name(self) -> &'static str {
        match self {
            Control::Phono => "Phono",
            Control::Media => "Media",
            Control::Cd => "CD",
            Control::Tuner => "Tuner",
            Control::Voldown => "Voldown",
            Control::Volup => "Volup",
            Control::Mute => "Mute",
        }
    }

    /// Looks a control up by its element id (`"cd"`, `"volup"`, …).
    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.element_id() == id)
    }

    /// Looks a control up by its wire name (`"CD"`, `"Volup"`, …).
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.wire_name() == name)
    }

    /// Builds the toggle command this control sends when clicked.
    pub fn toggle(self) -> Command {
        Command {
            control: self,
            action: Action::Toggle,
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Value carried by a command.
///
/// The device only understands `"toggle"`; anything else is ignored on the
/// firmware side, so it is not representable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Toggle,
}

/// One outbound button press.
///
/// # Serde representation
///
/// A JSON object with exactly one key, the control's wire name:
///
/// ```json
/// {"Phono":"toggle"}
/// {"CD":"toggle"}
/// {"Volup":"toggle"}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub control: Control,
    pub action: Action,
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.control.wire_name(), &self.action)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CommandVisitor)
    }
}

struct CommandVisitor;

impl<'de> Visitor<'de> for CommandVisitor {
    type Value = Command;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with exactly one control key")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Command, A::Error> {
        let key: String = map
            .next_key()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let control = Control::from_wire_name(&key).ok_or_else(|| {
            de::Error::unknown_variant(
                &key,
                &["Phono", "Media", "CD", "Tuner", "Voldown", "Volup", "Mute"],
            )
        })?;
        let action: Action = map.next_value()?;
        if map.next_key::<String>()?.is_some() {
            return Err(de::Error::invalid_length(2, &self));
        }
        Ok(Command { control, action })
    }
}

// ── Device state ──────────────────────────────────────────────────────────────

/// Mute status reported by the device.
///
/// Only the strings `"on"` and `"off"` carry meaning.  Anything else decodes
/// to [`MuteState::Unknown`]: other strings, `null`, booleans, numbers, and a
/// missing `mute` field.  The front end leaves the classes alone for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "MuteRepr")]
pub enum MuteState {
    On,
    Off,
    #[default]
    Unknown,
}

/// Accepted JSON shapes for a [`MuteState`].
#[derive(Deserialize)]
#[serde(untagged)]
enum MuteRepr {
    Text(String),
    Other(de::IgnoredAny),
}

impl From<MuteRepr> for MuteState {
    fn from(repr: MuteRepr) -> Self {
        match repr {
            MuteRepr::Text(s) if s == "on" => MuteState::On,
            MuteRepr::Text(s) if s == "off" => MuteState::Off,
            MuteRepr::Text(_) | MuteRepr::Other(_) => MuteState::Unknown,
        }
    }
}

/// A text shown verbatim on the display.
///
/// The firmware serialises the volume as a JSON number (attenuation steps,
/// `0` down to `-447`) while the source is a padded string such as
/// `"     CD    "`.  Both are accepted and kept as text; no trimming, unit
/// conversion or formatting happens on the remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LabelRepr", into = "String")]
pub struct DisplayLabel(String);

impl DisplayLabel {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DisplayLabel {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<DisplayLabel> for String {
    fn from(label: DisplayLabel) -> Self {
        label.0
    }
}

/// Accepted JSON shapes for a [`DisplayLabel`].
#[derive(Deserialize)]
#[serde(untagged)]
enum LabelRepr {
    Text(String),
    Integer(i64),
    Float(f64),
}

// Floats use Rust's `Display`, which matches JavaScript's `String(x)` for
// everything the firmware can send (it only emits integers).  Magnitudes of
// 1e21 and above, or below 1e-6, print positionally here where JavaScript
// switches to exponent notation.
impl From<LabelRepr> for DisplayLabel {
    fn from(repr: LabelRepr) -> Self {
        match repr {
            LabelRepr::Text(s) => Self(s),
            LabelRepr::Integer(n) => Self(n.to_string()),
            LabelRepr::Float(x) => Self(x.to_string()),
        }
    }
}

/// Full snapshot pushed by the device after every change.
///
/// # Serde representation
///
/// ```json
/// {"source":"CD","volume":"45","mute":"off"}
/// {"source":"  Phono ","volume":-312,"mute":"on"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    /// Label of the selected input.
    pub source: DisplayLabel,
    /// Current volume, as the device chose to present it.
    pub volume: DisplayLabel,
    /// Mute relay status.
    #[serde(default)]
    pub mute: MuteState,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
