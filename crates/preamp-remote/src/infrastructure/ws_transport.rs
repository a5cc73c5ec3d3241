//! WebSocket transport built on tokio-tungstenite.
//!
//! [`TungsteniteConnector::open`] performs the client handshake, splits the
//! stream and runs two tasks per connection:
//!
//! - **Writer**: drains the link's outbound channel into the socket.  When
//!   the manager drops the sender, the writer sends a Close frame.
//! - **Reader**: forwards every Text frame into the link's inbound channel.
//!   A Close frame, a socket error, or the end of the stream closes that
//!   channel, which the manager sees as the connection closing.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, trace, warn};

use crate::infrastructure::connection_manager::{ConnectionError, Connector, Link};

/// Capacity of the inbound frame channel of one connection.
const INBOUND_CHANNEL_CAPACITY: usize = 64;

/// Production [`Connector`]: plain `ws://` connections via tokio-tungstenite.
#[derive(Debug, Default, Clone, Copy)]
pub struct TungsteniteConnector;

impl TungsteniteConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for TungsteniteConnector {
    async fn open(&self, url: &str) -> Result<Link, ConnectionError> {
        let (ws_stream, _response) =
            connect_async(url)
                .await
                .map_err(|e| ConnectionError::Handshake {
                    url: url.to_string(),
                    source: Box::new(e),
                })?;

        let (mut ws_tx, mut ws_rx) = ws_stream.split();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<String>();
        let (inbound_tx, inbound) = mpsc::channel::<String>(INBOUND_CHANNEL_CAPACITY);

        // ── Writer ────────────────────────────────────────────────────────────
        tokio::spawn(async move {
            while let Some(text) = outbound_rx.recv().await {
                trace!("ws → device: {text}");
                if let Err(e) = ws_tx.send(WsMessage::Text(text)).await {
                    debug!("WebSocket send failed: {e}");
                    return;
                }
            }
            if let Err(e) = ws_tx.close().await {
                debug!("WebSocket close failed: {e}");
            }
        });

        // ── Reader ────────────────────────────────────────────────────────────
        tokio::spawn(async move {
            while let Some(frame) = ws_rx.next().await {
                match frame {
                    Ok(WsMessage::Text(text)) => {
                        trace!("ws ← device: {text}");
                        if inbound_tx.send(text).await.is_err() {
                            break;
                        }
                    }
                    Ok(WsMessage::Binary(bytes)) => {
                        warn!("ignoring {}-byte binary frame from device", bytes.len());
                    }
                    Ok(WsMessage::Close(frame)) => {
                        debug!("device sent close frame: {frame:?}");
                        break;
                    }
                    // Ping/Pong are answered by tungstenite itself.
                    Ok(_) => {}
                    Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => break,
                    Err(e) => {
                        warn!("WebSocket error: {e}");
                        break;
                    }
                }
            }
            debug!("WebSocket reader finished");
        });

        Ok(Link { outbound, inbound })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
