//! Connection registry and best-effort event fan-out

use crate::protocol::ServerMessage;
use metrics::{counter, gauge};
use std::{collections::HashMap, sync::Arc, time::Instant};
use tokio::sync::{
    RwLock,
    mpsc::{self, error::TrySendError},
};
use tracing::debug;
use uuid::Uuid;

/// A registered realtime session
pub struct Connection {
    pub id: Uuid,
    pub connected_at: Instant,
    pub sender: mpsc::Sender<ServerMessage>,
}

/// Process-wide connection registry
pub type ConnectionRegistry = Arc<RwLock<HashMap<Uuid, Connection>>>;

/// Handle returned to a socket task on connect
pub struct Subscription {
    pub id: Uuid,
    /// Sender for direct replies to this session (e.g. pong)
    pub sender: mpsc::Sender<ServerMessage>,
    pub receiver: mpsc::Receiver<ServerMessage>,
}

/// Fans mutation events out to every connected session.
///
/// Delivery is fire-and-forget: each session has a bounded outbound queue and
/// an event is dropped for any session whose queue is full or closed.
#[derive(Clone)]
pub struct Broadcaster {
    connections: ConnectionRegistry,
    outbound_buffer: usize,
}

impl Broadcaster {
    pub fn new(outbound_buffer: usize) -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
            outbound_buffer: outbound_buffer.max(1),
        }
    }

    /// Register a new session and return its outbound queue
    pub async fn connect(&self) -> Subscription {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(self.outbound_buffer);

        let mut connections = self.connections.write().await;
        connections.insert(
            id,
            Connection {
                id,
                connected_at: Instant::now(),
                sender: tx.clone(),
            },
        );
        gauge!("overlay_ws_connections_active").set(connections.len() as f64);

        Subscription {
            id,
            sender: tx,
            receiver: rx,
        }
    }

    /// Remove a session. Unknown ids are ignored.
    pub async fn disconnect(&self, id: Uuid) {
        let mut connections = self.connections.write().await;
        if let Some(conn) = connections.remove(&id) {
            debug!(
                "Session {} removed after {:?}",
                id,
                conn.connected_at.elapsed()
            );
        }
        gauge!("overlay_ws_connections_active").set(connections.len() as f64);
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send `message` to every session connected right now.
    ///
    /// Returns the number of sessions the message was queued for.
    pub async fn emit(&self, message: ServerMessage) -> usize {
        let event = message.message_type();
        counter!("overlay_broadcast_events_total", "event" => event).increment(1);

        let connections = self.connections.read().await;
        let mut delivered = 0;
        for conn in connections.values() {
            match conn.sender.try_send(message.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    debug!("Outbound queue full for {}, dropping {}", conn.id, event);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!("Session {} already closed, dropping {}", conn.id, event);
                }
            }
        }
        delivered
    }
}
