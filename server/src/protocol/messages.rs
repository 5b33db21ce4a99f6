use crate::overlay::{Overlay, OverlayId};
use serde::{Deserialize, Serialize};

/// Client to Server messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Keepalive; answered with `pong`
    Ping {
        #[serde(default)]
        seq: u64,
    },
}

/// Server to Client messages, framed as `{"event": <name>, "data": <payload>}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    /// An overlay was created
    OverlayCreated(Overlay),
    /// An overlay was updated; carries the post-update document
    OverlayUpdated(Overlay),
    /// An overlay was deleted
    OverlayDeleted {
        #[serde(rename = "_id")]
        id: OverlayId,
    },
    /// Reply to a client ping
    Pong { seq: u64 },
}

impl ClientMessage {
    /// Get the message type name for metrics
    pub fn message_type(&self) -> &'static str {
        match self {
            ClientMessage::Ping { .. } => "ping",
        }
    }
}

impl ServerMessage {
    /// Get the event name for metrics
    pub fn message_type(&self) -> &'static str {
        match self {
            ServerMessage::OverlayCreated(_) => "overlay_created",
            ServerMessage::OverlayUpdated(_) => "overlay_updated",
            ServerMessage::OverlayDeleted { .. } => "overlay_deleted",
            ServerMessage::Pong { .. } => "pong",
        }
    }
}
