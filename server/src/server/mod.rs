//! Shared application context, realtime layer and router assembly

pub mod broadcast;
pub mod router;
pub mod websocket;

pub use broadcast::Broadcaster;
pub use router::build_router;
pub use websocket::ws_handler;

use crate::overlay::OverlayRepository;
use crate::protocol::ServerMessage;
use std::sync::Arc;
use tracing::debug;

/// Shared application state, constructed once at startup and cloned into handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn OverlayRepository>,
    /// Present when the realtime layer is enabled
    pub broadcaster: Option<Broadcaster>,
}

impl AppState {
    pub fn new(repository: Arc<dyn OverlayRepository>) -> Self {
        Self {
            repository,
            broadcaster: None,
        }
    }

    pub fn with_broadcaster(mut self, broadcaster: Broadcaster) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    /// Queue `message` for all connected sessions without waiting on delivery.
    ///
    /// The emit runs on its own task, so nothing it does can fail or delay the
    /// caller. No-op when realtime is disabled.
    pub fn dispatch(&self, message: ServerMessage) {
        let Some(broadcaster) = self.broadcaster.clone() else {
            return;
        };
        tokio::spawn(async move {
            let event = message.message_type();
            let delivered = broadcaster.emit(message).await;
            debug!("Dispatched {} to {} session(s)", event, delivered);
        });
    }
}
