//! Overlay Server Library
//!
//! Persistence and realtime notification for positioned, sized content
//! overlays. Exported for the binary and for integration tests.

pub mod config;
pub mod overlay;
pub mod protocol;
pub mod server;

// Re-export commonly used types
pub use overlay::{InMemoryOverlayRepository, MongoOverlayRepository, OverlayRepository};
pub use protocol::{ClientMessage, ServerMessage};
pub use server::{AppState, Broadcaster, build_router};
