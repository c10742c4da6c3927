// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outbound message streaming to the channel gateway.
//!
//! The gateway holds a WebSocket connection and receives every outbound
//! message the core produces outside a direct request/response exchange:
//! scheduler fan-out and messages addressed to identities other than the
//! event's sender. Events are informational push traffic — no commands are
//! accepted over the socket.

use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use gift_fund_api::OutboundMessage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Maximum number of events to buffer in the broadcast channel.
/// If the gateway cannot keep up, older events will be dropped.
const EVENT_BUFFER_SIZE: usize = 256;

/// Events pushed to connected gateway clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server timestamp (ISO 8601).
        timestamp: String,
    },
    /// An outbound message request to deliver.
    Deliver {
        /// The message to deliver.
        message: OutboundMessage,
    },
}

/// Broadcaster for outbound message delivery.
#[derive(Clone)]
pub struct OutboundBroadcaster {
    tx: broadcast::Sender<GatewayEvent>,
}

impl OutboundBroadcaster {
    /// Creates a new broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Queues one outbound message for delivery.
    ///
    /// If no gateway is connected, the message is dropped and logged; one
    /// recipient's delivery problem never affects the rest.
    pub fn deliver(&self, message: &OutboundMessage) {
        let recipient: i64 = message.recipient;
        match self.tx.send(GatewayEvent::Deliver {
            message: message.clone(),
        }) {
            Ok(receivers) => {
                debug!(recipient, receivers, "Queued outbound message");
            }
            Err(_) => {
                warn!(recipient, "No gateway connected, outbound message dropped");
            }
        }
    }

    /// Queues each message in turn, isolating failures per recipient.
    pub fn deliver_all(&self, messages: &[OutboundMessage]) {
        for message in messages {
            self.deliver(message);
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.tx.subscribe()
    }
}

impl Default for OutboundBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles WebSocket upgrade requests from the gateway.
pub async fn live_handler(
    ws: WebSocketUpgrade,
    AxumState(broadcaster): AxumState<Arc<OutboundBroadcaster>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster))
}

/// Handles an individual gateway connection.
///
/// Sends a connection confirmation, then streams outbound messages until
/// the gateway disconnects or an error occurs.
async fn handle_socket(socket: WebSocket, broadcaster: Arc<OutboundBroadcaster>) {
    info!("Gateway connected to the delivery stream");

    let (mut sender, mut receiver) = socket.split();
    let mut rx: broadcast::Receiver<GatewayEvent> = broadcaster.subscribe();

    let connected_event = GatewayEvent::Connected {
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| String::from("unknown")),
    };

    if let Ok(json) = serde_json::to_string(&connected_event)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    // Task for sending events to the gateway
    let mut send_task = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        // Gateway disconnected
                        break;
                    }
                }
                Err(e) => {
                    error!(?e, "Failed to serialize gateway event");
                }
            }
        }
    });

    // Task for receiving messages from the gateway (none are expected)
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Received unexpected message from gateway, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Gateway sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Ping/pong handled automatically by Axum
                }
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!("Gateway disconnected from the delivery stream");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcaster_creation() {
        let broadcaster = OutboundBroadcaster::new();
        assert_eq!(broadcaster.tx.receiver_count(), 0);
    }

    #[test]
    fn test_deliver_without_receivers_does_not_panic() {
        let broadcaster = OutboundBroadcaster::new();
        broadcaster.deliver(&OutboundMessage::text(1, "hello"));
    }

    #[test]
    fn test_deliver_with_receiver() {
        let broadcaster = OutboundBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        broadcaster.deliver(&OutboundMessage::text(7, "happy birthday"));

        match rx.try_recv() {
            Ok(GatewayEvent::Deliver { message }) => {
                assert_eq!(message.recipient, 7);
                assert_eq!(message.text, "happy birthday");
            }
            other => panic!("Expected Deliver, got {other:?}"),
        }
    }

    #[test]
    fn test_deliver_all_preserves_order() {
        let broadcaster = OutboundBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        broadcaster.deliver_all(&[
            OutboundMessage::text(1, "first"),
            OutboundMessage::text(2, "second"),
        ]);

        assert!(matches!(
            rx.try_recv(),
            Ok(GatewayEvent::Deliver { message }) if message.recipient == 1
        ));
        assert!(matches!(
            rx.try_recv(),
            Ok(GatewayEvent::Deliver { message }) if message.recipient == 2
        ));
    }

    #[test]
    fn test_event_serialization() {
        let event = GatewayEvent::Deliver {
            message: OutboundMessage::text(5, "hello"),
        };

        let json = serde_json::to_string(&event).expect("Failed to serialize");
        let deserialized: GatewayEvent =
            serde_json::from_str(&json).expect("Failed to deserialize");

        match deserialized {
            GatewayEvent::Deliver { message } => {
                assert_eq!(message.recipient, 5);
                assert_eq!(message.text, "hello");
            }
            GatewayEvent::Connected { .. } => panic!("Wrong event type"),
        }
    }
}
