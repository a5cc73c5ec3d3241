//! Terminal front end.
//!
//! Output: [`TerminalDisplay`] keeps the three display elements in a
//! [`Panel`] and prints one status line per rendered snapshot.
//!
//! Input: [`read_buttons`] turns stdin lines into button presses, on a
//! thread of its own started by [`spawn_button_reader`].  A line is
//! either an element id (`phono`, `media`, `cd`, `tuner`, `voldown`,
//! `volup`, `mute`) or one of the shorthands:
//!
//! | Line        | Button  |
//! |-------------|---------|
//! | `+`         | volup   |
//! | `-`         | voldown |
//! | `m`         | mute    |
//! | `1` … `4`   | Phono, Media, CD, Tuner |

use std::io::{BufRead, Write};
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use preamp_core::Control;

use crate::application::{DisplaySurface, Element, StyleClass};

// ── Output ────────────────────────────────────────────────────────────────────

/// Current contents of the three display elements.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Panel {
    pub source: String,
    pub volume: String,
    pub volume_class: Option<StyleClass>,
    pub muted_class: Option<StyleClass>,
}

impl Panel {
    /// One-line rendering, e.g. `source: CD | volume: 45 [off] | muted [on]`.
    pub fn status_line(&self) -> String {
        let class = |c: Option<StyleClass>| c.map_or("-", StyleClass::as_str);
        format!(
            "source: {} | volume: {} [{}] | muted [{}]",
            self.source,
            self.volume,
            class(self.volume_class),
            class(self.muted_class),
        )
    }
}

/// [`DisplaySurface`] that writes status lines to any [`Write`] sink.
pub struct TerminalDisplay<W> {
    panel: Panel,
    out: W,
}

impl TerminalDisplay<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            panel: Panel::default(),
            out,
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    /// Consumes the display and returns its writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> DisplaySurface for TerminalDisplay<W> {
    fn set_text(&mut self, element: Element, text: &str) {
        match element {
            Element::Source => self.panel.source = text.to_string(),
            Element::Volume => self.panel.volume = text.to_string(),
            // The mute indicator has no text of its own.
            Element::Muted => {}
        }
    }

    fn set_class(&mut self, element: Element, class: StyleClass) {
        match element {
            Element::Volume => self.panel.volume_class = Some(class),
            Element::Muted => self.panel.muted_class = Some(class),
            Element::Source => {}
        }
    }

    fn present(&mut self) {
        let line = self.panel.status_line();
        if let Err(e) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            warn!("could not write status line: {e}");
        }
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Maps one input line to a button, or `None` if it names no button.
pub fn parse_button(line: &str) -> Option<Control> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "+" => Some(Control::Volup),
        "-" => Some(Control::Voldown),
        "m" => Some(Control::Mute),
        "1" | "2" | "3" | "4" => {
            let index = line.parse::<usize>().ok()? - 1;
            Control::SOURCES.get(index).copied()
        }
        id => Control::from_element_id(id),
    }
}

/// Short usage text listing every accepted input.
pub fn button_help() -> String {
    let ids: Vec<&str> = Control::ALL.iter().map(|c| c.element_id()).collect();
    format!(
        "buttons: {} | shorthands: + volup, - voldown, m mute, 1-4 phono/media/cd/tuner",
        ids.join(", ")
    )
}

/// Reads button presses line by line until EOF or until `tx` closes.
///
/// Blocking: run it on its own thread (see [`spawn_button_reader`]).  Blank
/// lines are skipped; unknown input is logged and ignored.
pub fn read_buttons<R: BufRead>(reader: R, tx: mpsc::Sender<Control>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("could not read button input: {e}");
                return;
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        match parse_button(&line) {
            Some(control) => {
                if tx.blocking_send(control).is_err() {
                    // Receiver dropped: the remote is shutting down.
                    return;
                }
            }
            None => warn!("unknown button '{}'; {}", line.trim(), button_help()),
        }
    }
    debug!("button input reached EOF");
}

/// Starts [`read_buttons`] on a dedicated, detached thread.
///
/// The thread is outside the Tokio runtime, so a read that never completes
/// (an idle terminal) does not hold up runtime shutdown.
///
/// # Errors
///
/// Returns the I/O error if the thread cannot be spawned.
pub fn spawn_button_reader<R>(
    reader: R,
    tx: mpsc::Sender<Control>,
) -> std::io::Result<thread::JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("preamp-buttons".to_string())
        .spawn(move || read_buttons(reader, tx))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor, Read};
    use std::time::{Duration, Instant};

    use tokio_test::assert_err;

    #[test]
    fn test_parse_button_accepts_every_element_id() {
        for control in Control::ALL {
            assert_eq!(parse_button(control.element_id()), Some(control));
        }
    }

    #[test]
    fn test_parse_button_shorthands() {
        assert_eq!(parse_button("+"), Some(Control::Volup));
        assert_eq!(parse_button("-"), Some(Control::Voldown));
        assert_eq!(parse_button("m"), Some(Control::Mute));
        assert_eq!(parse_button("1"), Some(Control::Phono));
        assert_eq!(parse_button("2"), Some(Control::Media));
        assert_eq!(parse_button("3"), Some(Control::Cd));
        assert_eq!(parse_button("4"), Some(Control::Tuner));
    }

    #[test]
    fn test_parse_button_ignores_case_and_whitespace() {
        assert_eq!(parse_button("  CD \n"), Some(Control::Cd));
        assert_eq!(parse_button("VolUp"), Some(Control::Volup));
    }

    #[test]
    fn test_parse_button_rejects_unknown_input() {
        assert_eq!(parse_button("5"), None);
        assert_eq!(parse_button("0"), None);
        assert_eq!(parse_button("power"), None);
        assert_eq!(parse_button("source"), None);
    }

    #[test]
    fn test_status_line_before_any_state() {
        assert_eq!(
            Panel::default().status_line(),
            "source:  | volume:  [-] | muted [-]"
        );
    }

    #[test]
    fn test_present_writes_one_status_line_per_snapshot() {
        // Arrange
        let mut display = TerminalDisplay::new(Vec::new());

        // Act
        display.set_text(Element::Source, "CD");
        display.set_text(Element::Volume, "45");
        display.set_class(Element::Volume, StyleClass::Off);
        display.set_class(Element::Muted, StyleClass::On);
        display.present();
        display.set_text(Element::Volume, "46");
        display.present();

        // Assert
        let output = String::from_utf8(display.into_inner()).unwrap();
        assert_eq!(
            output,
            "source: CD | volume: 45 [off] | muted [on]\n\
             source: CD | volume: 46 [off] | muted [on]\n"
        );
    }

    #[test]
    fn test_muted_text_is_not_stored() {
        let mut display = TerminalDisplay::new(Vec::new());
        display.set_text(Element::Muted, "ignored");
        assert_eq!(display.panel(), &Panel::default());
    }

    #[test]
    fn test_read_buttons_forwards_known_lines_and_skips_the_rest() {
        // Arrange
        let input: &[u8] = b"cd\n\nbogus\n+\n3\n";
        let (tx, mut rx) = mpsc::channel(8);

        // Act
        read_buttons(input, tx);

        // Assert
        assert_eq!(rx.try_recv(), Ok(Control::Cd));
        assert_eq!(rx.try_recv(), Ok(Control::Volup));
        assert_eq!(rx.try_recv(), Ok(Control::Cd));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_read_buttons_stops_when_receiver_is_gone() {
        let input: &[u8] = b"mute\nmute\nmute\n";
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        // Returns instead of blocking on a full channel.
        read_buttons(input, tx);
    }

    #[test]
    fn test_spawned_reader_delivers_to_async_receiver() {
        let (tx, mut rx) = mpsc::channel(8);
        let reader = spawn_button_reader(Cursor::new(b"tuner\nm\n".to_vec()), tx).unwrap();

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let received = rt.block_on(async { (rx.recv().await, rx.recv().await, rx.recv().await) });

        assert_eq!(received, (Some(Control::Tuner), Some(Control::Mute), None));
        reader.join().unwrap();
    }

    /// Input that blocks until its sender is dropped, like a terminal nobody types into.
    struct IdleInput {
        wake: std::sync::mpsc::Receiver<()>,
    }

    impl Read for IdleInput {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            let _ = self.wake.recv();
            Ok(0)
        }
    }

    #[test]
    fn test_runtime_shuts_down_while_button_input_is_idle() {
        // Arrange: a reader stuck in a read that will not finish on its own
        let (hold, wake) = std::sync::mpsc::channel::<()>();
        let (tx, mut rx) = mpsc::channel(1);
        let reader = spawn_button_reader(BufReader::new(IdleInput { wake }), tx).unwrap();
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let pending = tokio::time::timeout(Duration::from_millis(20), rx.recv()).await;
            assert_err!(pending);
        });

        // Act
        let started = Instant::now();
        drop(rt);

        // Assert: teardown did not wait for the blocked read
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(!reader.is_finished());

        drop(hold);
        reader.join().unwrap();
    }
}
