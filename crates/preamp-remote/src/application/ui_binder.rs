//! UiBinder: buttons → commands, device state → display.
//!
//! The binder owns nothing but its two collaborators:
//!
//! - a [`CommandSink`] (in production, the connection manager's handle), and
//! - a [`DisplaySurface`] (in production, the terminal panel).
//!
//! # Rendering rule
//!
//! Every state snapshot rewrites the `source` and `volume` texts verbatim.
//! The `on`/`off` classes of the `volume` and `muted` elements follow the
//! device's `mute` field:
//!
//! | `mute`  | `volume` class | `muted` class |
//! |---------|----------------|---------------|
//! | `"off"` | `off`          | `on`          |
//! | `"on"`  | `on`           | `off`         |
//! | other   | unchanged      | unchanged     |
//!
//! The pairing is exactly what the device's own web page applies and what
//! its stylesheet expects; it is kept as-is.

use async_trait::async_trait;
use tracing::debug;

use preamp_core::{decode_state, Command, Control, DeviceState, MuteState, ProtocolError};

// ── Display seam ──────────────────────────────────────────────────────────────

/// Display elements the binder writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    /// Label of the selected input.
    Source,
    /// Volume readout.
    Volume,
    /// Dedicated mute indicator.
    Muted,
}

impl Element {
    /// Element identifier, as used by the device's web page.
    pub fn id(self) -> &'static str {
        match self {
            Element::Source => "source",
            Element::Volume => "volume",
            Element::Muted => "muted",
        }
    }
}

/// The two mutually exclusive style classes of `volume` and `muted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleClass {
    On,
    Off,
}

impl StyleClass {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleClass::On => "on",
            StyleClass::Off => "off",
        }
    }
}

/// Something that can show the three display elements.
///
/// `set_class` replaces the element's class; the two classes are mutually
/// exclusive.
#[cfg_attr(test, mockall::automock)]
pub trait DisplaySurface: Send {
    /// Replaces the text of `element`.
    fn set_text(&mut self, element: Element, text: &str);

    /// Replaces the style class of `element`.
    fn set_class(&mut self, element: Element, class: StyleClass);

    /// Called once after a complete snapshot has been applied.
    fn present(&mut self) {}
}

// ── Command seam ──────────────────────────────────────────────────────────────

/// Outcome of handing a command to the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The frame was queued on the open connection.
    Sent,
    /// No connection was open; the frame was discarded.
    Dropped,
}

/// Outbound side of the device connection.
#[async_trait]
pub trait CommandSink: Send + Sync {
    /// Serialises `command` and writes it to the current connection.
    ///
    /// Commands are never buffered across a disconnection: when nothing is
    /// open the result is `Ok(Delivery::Dropped)`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] only if the command cannot be encoded.
    async fn send(&self, command: &Command) -> Result<Delivery, ProtocolError>;
}

// ── Binder ────────────────────────────────────────────────────────────────────

/// Binds the seven buttons and the three display elements to the device.
pub struct UiBinder<S, D> {
    sink: S,
    display: D,
}

impl<S: CommandSink, D: DisplaySurface> UiBinder<S, D> {
    pub fn new(sink: S, display: D) -> Self {
        Self { sink, display }
    }

    /// Handles a press of `control`: sends `{"<Control>":"toggle"}`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] if the command cannot be encoded.
    pub async fn click(&self, control: Control) -> Result<Delivery, ProtocolError> {
        let delivery = self.sink.send(&control.toggle()).await?;
        debug!(%control, ?delivery, "button pressed");
        Ok(delivery)
    }

    /// Decodes one device frame and renders it.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] if the frame does not decode.  Nothing is
    /// rendered in that case.
    pub fn on_message(&mut self, payload: &str) -> Result<(), ProtocolError> {
        let state = decode_state(payload)?;
        self.render(&state);
        Ok(())
    }

    /// Applies a state snapshot to the display.
    pub fn render(&mut self, state: &DeviceState) {
        self.display.set_text(Element::Source, state.source.as_str());
        self.display.set_text(Element::Volume, state.volume.as_str());

        match state.mute {
            MuteState::Off => {
                self.display.set_class(Element::Volume, StyleClass::Off);
                self.display.set_class(Element::Muted, StyleClass::On);
            }
            MuteState::On => {
                self.display.set_class(Element::Volume, StyleClass::On);
                self.display.set_class(Element::Muted, StyleClass::Off);
            }
            MuteState::Unknown => {}
        }

        self.display.present();
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use mockall::predicate::eq;

    use super::*;

    /// Records every outbound frame and answers with a fixed delivery.
    struct RecordingSink {
        frames: Mutex<Vec<String>>,
        delivery: Delivery,
    }

    impl RecordingSink {
        fn new(delivery: Delivery) -> Self {
            Self {
                frames: Mutex::new(Vec::new()),
                delivery,
            }
        }
    }

    #[async_trait]
    impl CommandSink for RecordingSink {
        async fn send(&self, command: &Command) -> Result<Delivery, ProtocolError> {
            let text = preamp_core::encode_command(command)?;
            self.frames.lock().unwrap().push(text);
            Ok(self.delivery)
        }
    }

    /// Keeps the current text and class of each element, like a page would.
    #[derive(Default)]
    struct PanelDouble {
        texts: HashMap<Element, String>,
        classes: HashMap<Element, StyleClass>,
        presents: usize,
    }

    impl DisplaySurface for PanelDouble {
        fn set_text(&mut self, element: Element, text: &str) {
            self.texts.insert(element, text.to_string());
        }

        fn set_class(&mut self, element: Element, class: StyleClass) {
            self.classes.insert(element, class);
        }

        fn present(&mut self) {
            self.presents += 1;
        }
    }

    fn binder() -> UiBinder<RecordingSink, PanelDouble> {
        UiBinder::new(RecordingSink::new(Delivery::Sent), PanelDouble::default())
    }

    #[tokio::test]
    async fn test_each_control_sends_exactly_one_toggle_frame() {
        for control in Control::ALL {
            // Arrange
            let binder = binder();

            // Act
            let delivery = binder.click(control).await.unwrap();

            // Assert
            assert_eq!(delivery, Delivery::Sent);
            let frames = binder.sink.frames.lock().unwrap();
            assert_eq!(frames.len(), 1);
            let value: serde_json::Value = serde_json::from_str(&frames[0]).unwrap();
            let obj = value.as_object().unwrap();
            assert_eq!(obj.len(), 1);
            assert_eq!(obj[control.wire_name()], "toggle");
        }
    }

    #[tokio::test]
    async fn test_click_reports_dropped_delivery() {
        let binder = UiBinder::new(RecordingSink::new(Delivery::Dropped), PanelDouble::default());

        let delivery = binder.click(Control::Mute).await.unwrap();

        assert_eq!(delivery, Delivery::Dropped);
    }

    #[test]
    fn test_mute_off_marks_volume_off_and_indicator_on() {
        // Arrange
        let mut binder = binder();

        // Act
        binder
            .on_message(r#"{"source":"CD","volume":"45","mute":"off"}"#)
            .unwrap();

        // Assert
        let panel = binder.display();
        assert_eq!(panel.texts[&Element::Source], "CD");
        assert_eq!(panel.texts[&Element::Volume], "45");
        assert_eq!(panel.classes[&Element::Volume], StyleClass::Off);
        assert_eq!(panel.classes[&Element::Muted], StyleClass::On);
    }

    #[test]
    fn test_mute_on_marks_volume_on_and_indicator_off() {
        let mut binder = binder();

        binder
            .on_message(r#"{"source":"Tuner","volume":"12","mute":"on"}"#)
            .unwrap();

        let panel = binder.display();
        assert_eq!(panel.texts[&Element::Source], "Tuner");
        assert_eq!(panel.texts[&Element::Volume], "12");
        assert_eq!(panel.classes[&Element::Muted], StyleClass::Off);
        assert_eq!(panel.classes[&Element::Volume], StyleClass::On);
    }

    #[test]
    fn test_unknown_mute_keeps_previous_classes() {
        // Arrange: a muted snapshot first
        let mut binder = binder();
        binder
            .on_message(r#"{"source":"Tuner","volume":"12","mute":"on"}"#)
            .unwrap();

        // Act
        binder
            .on_message(r#"{"source":"Phono","volume":"30","mute":"unknown"}"#)
            .unwrap();

        // Assert: texts follow the new snapshot, classes stay as they were
        let panel = binder.display();
        assert_eq!(panel.texts[&Element::Source], "Phono");
        assert_eq!(panel.texts[&Element::Volume], "30");
        assert_eq!(panel.classes[&Element::Volume], StyleClass::On);
        assert_eq!(panel.classes[&Element::Muted], StyleClass::Off);
    }

    #[test]
    fn test_non_string_or_missing_mute_updates_texts_only() {
        for frame in [
            r#"{"source":"CD","volume":"45","mute":null}"#,
            r#"{"source":"CD","volume":"45","mute":true}"#,
            r#"{"source":"CD","volume":"45"}"#,
        ] {
            // Arrange: a muted snapshot first
            let mut binder = binder();
            binder
                .on_message(r#"{"source":"Tuner","volume":"12","mute":"on"}"#)
                .unwrap();

            // Act
            binder.on_message(frame).unwrap();

            // Assert
            let panel = binder.display();
            assert_eq!(panel.texts[&Element::Source], "CD", "{frame}");
            assert_eq!(panel.texts[&Element::Volume], "45", "{frame}");
            assert_eq!(panel.classes[&Element::Volume], StyleClass::On, "{frame}");
            assert_eq!(panel.classes[&Element::Muted], StyleClass::Off, "{frame}");
            assert_eq!(panel.presents, 2);
        }
    }

    #[test]
    fn test_numeric_volume_is_rendered_as_text() {
        let mut binder = binder();

        binder
            .on_message(r#"{"source":"  Phono ","volume":-120,"mute":"off"}"#)
            .unwrap();

        assert_eq!(binder.display().texts[&Element::Volume], "-120");
        assert_eq!(binder.display().texts[&Element::Source], "  Phono ");
    }

    #[test]
    fn test_each_snapshot_overwrites_the_previous_one() {
        let mut binder = binder();

        binder
            .on_message(r#"{"source":"CD","volume":"45","mute":"off"}"#)
            .unwrap();
        binder
            .on_message(r#"{"source":"Media","volume":"44","mute":"on"}"#)
            .unwrap();

        let panel = binder.display();
        assert_eq!(panel.texts[&Element::Source], "Media");
        assert_eq!(panel.texts[&Element::Volume], "44");
        assert_eq!(panel.classes[&Element::Volume], StyleClass::On);
        assert_eq!(panel.presents, 2);
    }

    #[test]
    fn test_malformed_payload_renders_nothing() {
        let mut binder = binder();

        let result = binder.on_message("source=CD");

        assert!(result.is_err());
        assert!(binder.display().texts.is_empty());
        assert_eq!(binder.display().presents, 0);
    }

    #[test]
    fn test_unknown_mute_never_touches_classes() {
        // Arrange: a strict mock that fails on any set_class call
        let mut display = MockDisplaySurface::new();
        display.expect_set_text().times(2).return_const(());
        display.expect_set_class().never();
        display.expect_present().times(1).return_const(());
        let mut binder = UiBinder::new(RecordingSink::new(Delivery::Sent), display);

        // Act / Assert (mock verifies on drop)
        binder
            .on_message(r#"{"source":"Phono","volume":"30","mute":"unknown"}"#)
            .unwrap();
    }

    #[test]
    fn test_mute_off_sets_classes_in_page_order() {
        let mut display = MockDisplaySurface::new();
        let mut seq = mockall::Sequence::new();
        display.expect_set_text().times(2).return_const(());
        display
            .expect_set_class()
            .with(eq(Element::Volume), eq(StyleClass::Off))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        display
            .expect_set_class()
            .with(eq(Element::Muted), eq(StyleClass::On))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        display.expect_present().times(1).return_const(());
        let mut binder = UiBinder::new(RecordingSink::new(Delivery::Sent), display);

        binder
            .on_message(r#"{"source":"CD","volume":"45","mute":"off"}"#)
            .unwrap();
    }

    #[test]
    fn test_element_ids_match_page() {
        assert_eq!(Element::Source.id(), "source");
        assert_eq!(Element::Volume.id(), "volume");
        assert_eq!(Element::Muted.id(), "muted");
        assert_eq!(StyleClass::On.as_str(), "on");
        assert_eq!(StyleClass::Off.as_str(), "off");
    }
}
