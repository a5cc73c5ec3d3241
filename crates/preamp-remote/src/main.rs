//! Preamp remote entry point.
//!
//! A terminal remote control for the ESP32 preamplifier controller.  It keeps
//! one WebSocket connection to the device's control socket open (reopening it
//! two seconds after every closure), turns typed button names into toggle
//! commands, and prints a status line every time the device pushes its state.
//!
//! # Usage
//!
//! ```text
//! preamp-remote [OPTIONS]
//!
//! Options:
//!   --host <HOST>          Device host or host:port [default: esp32HiFi.local]
//!   --reconnect-ms <MS>    Delay before reconnecting [default: 2000]
//!   --config <PATH>        Optional TOML settings file
//! ```
//!
//! Then type one button per line: `phono`, `media`, `cd`, `tuner`,
//! `voldown`, `volup`, `mute`, or `+`, `-`, `m`, `1`–`4`.
//!
//! # Environment variable overrides
//!
//! | Variable              | Default           | Description                    |
//! |-----------------------|-------------------|--------------------------------|
//! | `PREAMP_HOST`         | `esp32HiFi.local` | Device host                    |
//! | `PREAMP_RECONNECT_MS` | `2000`            | Reconnect delay (ms)           |
//! | `PREAMP_CONFIG`       | none              | Settings file path             |
//! | `RUST_LOG`            | settings `log_level` | Log filter                  |
//!
//! Flags and environment variables win over the settings file, which wins
//! over the built-in defaults.  Logs go to stderr; stdout carries only the
//! status lines.
//!
//! # Architecture overview
//!
//! ```text
//! stdin ──► button thread ──► clicks ─┐
//!                                     ├─► run_dispatch ─► UiBinder ─► TerminalDisplay (stdout)
//! device ◄─► ConnectionManager ─► events ─┘        │
//!                 ▲                                │
//!                 └──────── ConnectionHandle ◄─────┘
//! ```

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use preamp_remote::application::{run_dispatch, UiBinder};
use preamp_remote::infrastructure::{
    button_help, load_settings, spawn_button_reader, ConnectionManager, RemoteSettings,
    TerminalDisplay, TungsteniteConnector,
};

/// Capacity of the button press channel.
const CLICK_CHANNEL_CAPACITY: usize = 32;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Terminal remote control for the ESP32 preamplifier.
#[derive(Debug, Parser)]
#[command(
    name = "preamp-remote",
    about = "WebSocket remote control for the ESP32 preamplifier controller",
    version
)]
struct Cli {
    /// Device host, optionally with `:port`.
    ///
    /// The control socket is always `ws://<HOST>/ws`.
    #[arg(long, env = "PREAMP_HOST")]
    host: Option<String>,

    /// Milliseconds to wait after a closure before connecting again.
    #[arg(long, env = "PREAMP_RECONNECT_MS")]
    reconnect_ms: Option<u64>,

    /// TOML settings file.
    #[arg(long, env = "PREAMP_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Loads the settings file (if any) and applies flag overrides on top.
    ///
    /// # Errors
    ///
    /// Returns an error if `--config` names a file that cannot be read or
    /// parsed.
    fn resolve_settings(&self) -> anyhow::Result<RemoteSettings> {
        let mut settings = match &self.config {
            Some(path) => load_settings(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?,
            None => RemoteSettings::default(),
        };

        if let Some(host) = &self.host {
            settings.device.host = host.clone();
        }
        if let Some(ms) = self.reconnect_ms {
            settings.connection.reconnect_delay_ms = ms;
        }
        Ok(settings)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.resolve_settings()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // `RUST_LOG` wins; otherwise the settings file's `log_level`.  Logs go to
    // stderr so they never interleave with the status lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&settings.log_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = settings.to_config();
    let manager = ConnectionManager::from_config(&config, TungsteniteConnector::new())
        .context("invalid device host")?;

    info!(
        "preamp remote starting: gateway={}, reconnect={} ms",
        manager.url(),
        config.reconnect_delay.as_millis()
    );

    // ── Graceful shutdown flag ────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));

    // ── Connection and button input ───────────────────────────────────────────
    let manager = Arc::new(manager);
    let events = Arc::clone(&manager).start(Arc::clone(&running));

    let (click_tx, click_rx) = mpsc::channel(CLICK_CHANNEL_CAPACITY);
    // A blocking thread of its own: an idle stdin must not hold up shutdown.
    spawn_button_reader(std::io::BufReader::new(std::io::stdin()), click_tx)
        .context("failed to start the button input thread")?;
    println!("{}", button_help());

    // ── Dispatch until Ctrl+C ─────────────────────────────────────────────────
    let mut binder = UiBinder::new(manager.handle(), TerminalDisplay::stdout());

    tokio::select! {
        stats = run_dispatch(&mut binder, events, click_rx) => {
            info!(?stats, "connection events ended");
        }
        signal = tokio::signal::ctrl_c() => {
            running.store(false, Ordering::Relaxed);
            match signal {
                Ok(()) => info!("received Ctrl+C, shutting down"),
                Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
            }
        }
    }

    info!("preamp remote stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
