//! The connection manager: one device connection, reopened forever.
//!
//! # Lifecycle
//!
//! ```text
//! start()
//!   └─ loop
//!        ├─ Connecting: Connector::open(url)
//!        ├─ Open:       publish Opened, then every inbound frame as Message
//!        ├─ Closed:     publish Closed
//!        └─ sleep(reconnect_delay)   (always; no backoff, no retry limit)
//! ```
//!
//! A failed handshake goes straight from Connecting to Closed and follows the
//! same delay.  A new connection is only opened after the previous one has
//! been dropped, so at most one exists at any time.
//!
//! # Sending
//!
//! The manager keeps the outbound half of the current connection in a slot
//! shared with every [`ConnectionHandle`].  Only the manager's loop writes
//! the slot; handles only read it.  When the slot is empty a send is
//! discarded, never queued for a later connection.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::{
    sync::{mpsc, watch, Mutex},
    time,
};
use tracing::{debug, info, warn};

use preamp_core::{encode_command, Command, ProtocolError};

use crate::application::{CommandSink, Delivery};
use crate::domain::{ConfigError, ConnectionEvent, ConnectionState, RemoteConfig};

/// Capacity of the event channel returned by [`ConnectionManager::start`].
const EVENT_CHANNEL_CAPACITY: usize = 128;

/// Errors raised while opening a connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The WebSocket handshake with the device failed (DNS, refused TCP
    /// connection, HTTP upgrade rejected, …).
    #[error("WebSocket handshake with {url} failed: {source}")]
    Handshake {
        url: String,
        #[source]
        source: Box<tokio_tungstenite::tungstenite::Error>,
    },
}

/// An open connection, as seen by the manager.
///
/// The transport closes the connection once `outbound` is dropped, and
/// signals a remote closure by closing `inbound`.
#[derive(Debug)]
pub struct Link {
    /// Text frames to write to the device.
    pub outbound: mpsc::UnboundedSender<String>,
    /// Text frames received from the device.
    pub inbound: mpsc::Receiver<String>,
}

/// Opens connections to the device.
///
/// The production implementation is
/// [`TungsteniteConnector`](crate::infrastructure::ws_transport::TungsteniteConnector);
/// tests substitute in-memory links.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Performs the handshake with `url` and returns the open link.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the connection cannot be opened.
    async fn open(&self, url: &str) -> Result<Link, ConnectionError>;
}

/// Owns the single device connection and its reconnect loop.
pub struct ConnectionManager<C> {
    url: String,
    reconnect_delay: Duration,
    connector: C,
    slot: Arc<Mutex<Option<mpsc::UnboundedSender<String>>>>,
    state: watch::Sender<ConnectionState>,
}

impl<C: Connector> ConnectionManager<C> {
    /// Creates a manager for `url`.  Nothing is opened until [`start`](Self::start).
    pub fn new(url: impl Into<String>, reconnect_delay: Duration, connector: C) -> Self {
        let (state, _) = watch::channel(ConnectionState::Connecting);
        Self {
            url: url.into(),
            reconnect_delay,
            connector,
            slot: Arc::new(Mutex::new(None)),
            state,
        }
    }

    /// Creates a manager targeting the gateway URL derived from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the device host is invalid.
    pub fn from_config(config: &RemoteConfig, connector: C) -> Result<Self, ConfigError> {
        Ok(Self::new(config.gateway_url()?, config.reconnect_delay, connector))
    }

    /// The URL every connection attempt targets.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns a handle for sending commands over the current connection.
    pub fn handle(&self) -> ConnectionHandle {
        ConnectionHandle {
            slot: Arc::clone(&self.slot),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Subscribes to lifecycle state changes.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Spawns the connect/reconnect loop and returns its event stream.
    ///
    /// `running` is checked at start and after every closure, before the
    /// reconnect is scheduled.  Once the delay has started the reconnect
    /// always fires, even if `running` is cleared meanwhile.  The loop also
    /// ends when the returned receiver is dropped.
    pub fn start(self: Arc<Self>, running: Arc<AtomicBool>) -> mpsc::Receiver<ConnectionEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            if running.load(Ordering::Relaxed) {
                loop {
                    if !self.connect_once(&tx).await {
                        debug!("event receiver dropped; connection manager stopping");
                        return;
                    }
                    if !running.load(Ordering::Relaxed) {
                        break;
                    }
                    time::sleep(self.reconnect_delay).await;
                }
            }
            info!("shutdown requested; connection manager stopping");
        });

        rx
    }

    /// Runs one Connecting → (Open →) Closed cycle.
    ///
    /// Returns `false` once nobody is listening for events any more.
    async fn connect_once(&self, tx: &mpsc::Sender<ConnectionEvent>) -> bool {
        self.state.send_replace(ConnectionState::Connecting);
        info!("trying to open a WebSocket connection to {}", self.url);

        match self.connector.open(&self.url).await {
            Ok(Link {
                outbound,
                mut inbound,
            }) => {
                *self.slot.lock().await = Some(outbound);
                self.state.send_replace(ConnectionState::Open);
                info!("connection opened");

                let mut listening = tx.send(ConnectionEvent::Opened).await.is_ok();
                while listening {
                    match inbound.recv().await {
                        Some(payload) => {
                            listening = tx.send(ConnectionEvent::Message(payload)).await.is_ok();
                        }
                        None => break,
                    }
                }

                // Dropping the outbound sender lets the transport finish closing.
                self.slot.lock().await.take();

                if !listening {
                    self.state.send_replace(ConnectionState::Closed);
                    return false;
                }
            }
            Err(e) => warn!("{e}"),
        }

        self.state.send_replace(ConnectionState::Closed);
        info!(
            "connection closed; reconnecting in {} ms",
            self.reconnect_delay.as_millis()
        );
        tx.send(ConnectionEvent::Closed).await.is_ok()
    }
}

// ── Handle ────────────────────────────────────────────────────────────────────

/// Cloneable sending side of the [`ConnectionManager`].
///
/// Handed to the [`UiBinder`](crate::application::UiBinder) as its
/// [`CommandSink`].
#[derive(Clone)]
pub struct ConnectionHandle {
    slot: Arc<Mutex<Option<mpsc::UnboundedSender<String>>>>,
}

impl ConnectionHandle {
    /// `true` while a connection is open.
    pub async fn is_open(&self) -> bool {
        self.slot
            .lock()
            .await
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }
}

#[async_trait]
impl CommandSink for ConnectionHandle {
    async fn send(&self, command: &Command) -> Result<Delivery, ProtocolError> {
        let text = encode_command(command)?;

        let delivery = match self.slot.lock().await.as_ref() {
            Some(tx) => match tx.send(text) {
                Ok(()) => Delivery::Sent,
                Err(_) => Delivery::Dropped,
            },
            None => Delivery::Dropped,
        };

        if delivery == Delivery::Dropped {
            debug!(control = %command.control, "no open connection; command dropped");
        }
        Ok(delivery)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
