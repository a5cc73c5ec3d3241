//! Application layer for preamp-remote.
//!
//! - **`ui_binder`** – Maps the seven buttons to toggle commands and maps
//!   device state snapshots onto the display elements.  The display and the
//!   outbound connection are injected as [`DisplaySurface`] and
//!   [`CommandSink`] implementations.
//!
//! - **`dispatch`** – The single consumer loop that feeds connection events
//!   and button presses into the binder one at a time.

pub mod dispatch;
pub mod ui_binder;

pub use dispatch::{run_dispatch, DispatchStats};
pub use ui_binder::{CommandSink, Delivery, DisplaySurface, Element, StyleClass, UiBinder};
