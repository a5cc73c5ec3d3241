//! The dispatch loop: the only place where connection events and button
//! presses reach the [`UiBinder`].
//!
//! Both inputs arrive on channels and are handled strictly one at a time, so
//! a render never interleaves with a click.

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use preamp_core::Control;

use crate::application::ui_binder::{CommandSink, Delivery, DisplaySurface, UiBinder};
use crate::domain::ConnectionEvent;

/// Counters collected by [`run_dispatch`], mostly for tests and the exit log.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    /// Device frames decoded and rendered.
    pub rendered: usize,
    /// Device frames that failed to decode.
    pub rejected: usize,
    /// Button presses whose frame reached an open connection.
    pub sent: usize,
    /// Button presses discarded because nothing was open.
    pub dropped: usize,
}

/// Feeds connection events and button presses into `binder` until the
/// connection event channel closes.
///
/// The click channel closing (for example stdin reaching EOF) does not stop
/// the loop; the display keeps following the device.
pub async fn run_dispatch<S, D>(
    binder: &mut UiBinder<S, D>,
    mut events: mpsc::Receiver<ConnectionEvent>,
    mut clicks: mpsc::Receiver<Control>,
) -> DispatchStats
where
    S: CommandSink,
    D: DisplaySurface,
{
    let mut stats = DispatchStats::default();
    let mut clicks_open = true;

    loop {
        tokio::select! {
            // Queued button presses are drained before device frames.
            biased;

            click = clicks.recv(), if clicks_open => match click {
                Some(control) => match binder.click(control).await {
                    Ok(Delivery::Sent) => stats.sent += 1,
                    Ok(Delivery::Dropped) => stats.dropped += 1,
                    Err(e) => error!("could not encode {control} command: {e}"),
                },
                None => {
                    debug!("dispatch: button input closed");
                    clicks_open = false;
                }
            },
            event = events.recv() => match event {
                Some(ConnectionEvent::Opened) => debug!("dispatch: connection opened"),
                Some(ConnectionEvent::Closed) => debug!("dispatch: connection closed"),
                Some(ConnectionEvent::Message(payload)) => match binder.on_message(&payload) {
                    Ok(()) => stats.rendered += 1,
                    Err(e) => {
                        warn!("discarding device message: {e}");
                        stats.rejected += 1;
                    }
                },
                None => break,
            },
        }
    }

    stats
}

// ── Tests ─────────────────────────────────────────────────────────────────────
