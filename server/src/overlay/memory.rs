//! In-process overlay repository
//!
//! Keeps overlays in insertion order. Used by the test suite and by callers
//! that embed the router without a database.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use super::repository::OverlayRepository;
use super::types::{NewOverlay, Overlay, OverlayError, OverlayId, OverlayPatch};

#[derive(Default)]
pub struct InMemoryOverlayRepository {
    overlays: RwLock<IndexMap<OverlayId, Overlay>>,
}

impl InMemoryOverlayRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.overlays.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl OverlayRepository for InMemoryOverlayRepository {
    async fn insert(&self, overlay: NewOverlay) -> Result<Overlay, OverlayError> {
        let overlay = overlay.into_overlay(OverlayId::new());
        self.overlays
            .write()
            .await
            .insert(overlay.id, overlay.clone());
        Ok(overlay)
    }

    async fn find_all(&self) -> Result<Vec<Overlay>, OverlayError> {
        Ok(self.overlays.read().await.values().cloned().collect())
    }

    async fn update_by_id(
        &self,
        id: &OverlayId,
        patch: &OverlayPatch,
    ) -> Result<Overlay, OverlayError> {
        let mut overlays = self.overlays.write().await;
        let overlay = overlays.get_mut(id).ok_or(OverlayError::NotFound(*id))?;
        patch.apply(overlay);
        Ok(overlay.clone())
    }

    async fn delete_by_id(&self, id: &OverlayId) -> Result<(), OverlayError> {
        // shift_remove keeps the remaining overlays in insertion order
        self.overlays
            .write()
            .await
            .shift_remove(id)
            .map(|_| ())
            .ok_or(OverlayError::NotFound(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::types::{OverlayContent, Position, Size};

    fn text_overlay(content: &str) -> NewOverlay {
        NewOverlay {
            kind: Some("text".into()),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let repo = InMemoryOverlayRepository::new();
        let a = repo.insert(text_overlay("a")).await.unwrap();
        let b = repo.insert(text_overlay("b")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_find_all_preserves_insertion_order() {
        let repo = InMemoryOverlayRepository::new();
        for c in ["first", "second", "third"] {
            repo.insert(text_overlay(c)).await.unwrap();
        }
        let b = repo.find_all().await.unwrap()[1].id;
        repo.delete_by_id(&b).await.unwrap();

        let contents: Vec<Option<OverlayContent>> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.content)
            .collect();
        assert_eq!(
            contents,
            vec![
                Some(OverlayContent::from("first")),
                Some(OverlayContent::from("third"))
            ]
        );
    }

    #[tokio::test]
    async fn test_update_changes_only_provided_fields() {
        let repo = InMemoryOverlayRepository::new();
        let created = repo.insert(text_overlay("before")).await.unwrap();

        let patch = OverlayPatch {
            position: Some(Position { x: 5.0, y: 7.0 }),
            ..Default::default()
        };
        let updated = repo.update_by_id(&created.id, &patch).await.unwrap();

        assert_eq!(updated.position, Position { x: 5.0, y: 7.0 });
        assert_eq!(updated.size, Size::default());
        assert_eq!(updated.content, created.content);
        assert_eq!(repo.find_all().await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryOverlayRepository::new();
        let err = repo
            .update_by_id(&OverlayId::new(), &OverlayPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OverlayError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let repo = InMemoryOverlayRepository::new();
        repo.insert(text_overlay("keep")).await.unwrap();

        let err = repo.delete_by_id(&OverlayId::new()).await.unwrap_err();
        assert!(matches!(err, OverlayError::NotFound(_)));
        assert_eq!(repo.len().await, 1);
    }
}
