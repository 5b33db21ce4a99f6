//! OverlayRepository trait definition

use async_trait::async_trait;

use super::types::{NewOverlay, Overlay, OverlayError, OverlayId, OverlayPatch};

/// Trait for overlay storage backends (MongoDB or in-memory)
#[async_trait]
pub trait OverlayRepository: Send + Sync {
    /// Store a new overlay, applying default geometry, and return it with its id
    async fn insert(&self, overlay: NewOverlay) -> Result<Overlay, OverlayError>;

    /// Read every stored overlay, in storage order
    async fn find_all(&self) -> Result<Vec<Overlay>, OverlayError>;

    /// Apply the provided fields and return the post-update overlay
    async fn update_by_id(
        &self,
        id: &OverlayId,
        patch: &OverlayPatch,
    ) -> Result<Overlay, OverlayError>;

    /// Remove an overlay
    async fn delete_by_id(&self, id: &OverlayId) -> Result<(), OverlayError>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> Result<(), OverlayError> {
        Ok(())
    }
}
