//! Overlay records: types, storage backends and HTTP routes

pub mod memory;
pub mod mongo;
pub mod repository;
pub mod routes;
pub mod types;

pub use memory::InMemoryOverlayRepository;
pub use mongo::MongoOverlayRepository;
pub use repository::OverlayRepository;
pub use routes::overlay_routes;
pub use types::{
    DeleteResponse, NewOverlay, Overlay, OverlayContent, OverlayError, OverlayId, OverlayPatch,
    Position, Size,
};
