//! MongoDB-backed overlay repository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{self, Document, doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::repository::OverlayRepository;
use super::types::{
    NewOverlay, Overlay, OverlayContent, OverlayError, OverlayId, OverlayPatch, Position, Size,
};
use crate::config::StorageConfig;

/// On-disk shape of an overlay document
#[derive(Debug, Serialize, Deserialize)]
struct OverlayDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    content: Option<OverlayContent>,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    size: Size,
}

impl From<OverlayDocument> for Overlay {
    fn from(d: OverlayDocument) -> Self {
        Overlay {
            id: d.id.into(),
            kind: d.kind,
            content: d.content,
            position: d.position,
            size: d.size,
        }
    }
}

impl From<&Overlay> for OverlayDocument {
    fn from(o: &Overlay) -> Self {
        OverlayDocument {
            id: o.id.object_id(),
            kind: o.kind.clone(),
            content: o.content.clone(),
            position: o.position,
            size: o.size,
        }
    }
}

fn to_bson<T: Serialize>(value: &T) -> Result<bson::Bson, OverlayError> {
    bson::to_bson(value).map_err(|e| OverlayError::StorageUnavailable(e.to_string()))
}

/// Build the `$set` operand for a patch; only provided fields are included
fn set_document(patch: &OverlayPatch) -> Result<Document, OverlayError> {
    let mut set = Document::new();
    if let Some(kind) = &patch.kind {
        set.insert("type", kind.as_str());
    }
    if let Some(content) = &patch.content {
        set.insert("content", to_bson(content)?);
    }
    if let Some(position) = &patch.position {
        set.insert("position", to_bson(position)?);
    }
    if let Some(size) = &patch.size {
        set.insert("size", to_bson(size)?);
    }
    Ok(set)
}

/// Overlay repository over a single MongoDB collection
pub struct MongoOverlayRepository {
    database: Database,
    collection: Collection<OverlayDocument>,
}

impl MongoOverlayRepository {
    /// Connect using the configured URI and verify the server answers a ping
    pub async fn connect(config: &StorageConfig) -> Result<Self, OverlayError> {
        let client = Client::with_uri_str(&config.uri).await?;
        let database = client.database(&config.database);
        let collection = database.collection::<OverlayDocument>(&config.collection);
        let repo = Self {
            database,
            collection,
        };
        repo.ping().await?;
        info!(
            "Connected to MongoDB: database={}, collection={}",
            config.database, config.collection
        );
        Ok(repo)
    }
}

#[async_trait]
impl OverlayRepository for MongoOverlayRepository {
    async fn insert(&self, overlay: NewOverlay) -> Result<Overlay, OverlayError> {
        let overlay = overlay.into_overlay(OverlayId::new());
        self.collection
            .insert_one(OverlayDocument::from(&overlay))
            .await?;
        debug!("Inserted overlay {}", overlay.id);
        Ok(overlay)
    }

    async fn find_all(&self) -> Result<Vec<Overlay>, OverlayError> {
        let cursor = self.collection.find(doc! {}).await?;
        let docs: Vec<OverlayDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Overlay::from).collect())
    }

    async fn update_by_id(
        &self,
        id: &OverlayId,
        patch: &OverlayPatch,
    ) -> Result<Overlay, OverlayError> {
        let filter = doc! { "_id": id.object_id() };

        let updated = if patch.is_empty() {
            self.collection.find_one(filter).await?
        } else {
            self.collection
                .find_one_and_update(filter, doc! { "$set": set_document(patch)? })
                .return_document(ReturnDocument::After)
                .await?
        };

        updated
            .map(Overlay::from)
            .ok_or(OverlayError::NotFound(*id))
    }

    async fn delete_by_id(&self, id: &OverlayId) -> Result<(), OverlayError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.object_id() })
            .await?;
        if result.deleted_count == 0 {
            return Err(OverlayError::NotFound(*id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), OverlayError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
