//! Overlay-related types and error definitions

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when working with overlays
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("Invalid overlay id: {0}")]
    InvalidId(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Overlay not found")]
    NotFound(OverlayId),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<mongodb::error::Error> for OverlayError {
    fn from(e: mongodb::error::Error) -> Self {
        OverlayError::StorageUnavailable(e.to_string())
    }
}

/// Storage-assigned overlay identifier, exposed as a 24-digit hex string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(ObjectId);

impl OverlayId {
    /// Allocate a fresh identifier
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for OverlayId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for OverlayId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for OverlayId {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| OverlayError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Serialize for OverlayId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for OverlayId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Top-left corner of an overlay, in player coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Overlay box dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 50.0,
        }
    }
}

/// Overlay payload. Opaque to the server, stored and returned verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverlayContent {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    List(Vec<serde_json::Value>),
    Structured(serde_json::Map<String, serde_json::Value>),
}

impl From<&str> for OverlayContent {
    fn from(s: &str) -> Self {
        OverlayContent::Text(s.to_string())
    }
}

/// A persisted overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    #[serde(rename = "_id")]
    pub id: OverlayId,
    /// Overlay kind tag (e.g. "text", "image"); not interpreted
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub content: Option<OverlayContent>,
    pub position: Position,
    pub size: Size,
}

/// Request body for overlay creation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewOverlay {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub content: Option<OverlayContent>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub size: Option<Size>,
}

impl NewOverlay {
    /// Resolve the record to persist under `id`, filling in default geometry
    pub fn into_overlay(self, id: OverlayId) -> Overlay {
        Overlay {
            id,
            kind: self.kind,
            content: self.content,
            position: self.position.unwrap_or_default(),
            size: self.size.unwrap_or_default(),
        }
    }
}

/// Partial update. Absent and `null` fields both leave the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverlayPatch {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub content: Option<OverlayContent>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub size: Option<Size>,
}

impl OverlayPatch {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.content.is_none()
            && self.position.is_none()
            && self.size.is_none()
    }

    /// Apply the provided fields to `overlay` in place
    pub fn apply(&self, overlay: &mut Overlay) {
        if let Some(kind) = &self.kind {
            overlay.kind = Some(kind.clone());
        }
        if let Some(content) = &self.content {
            overlay.content = Some(content.clone());
        }
        if let Some(position) = self.position {
            overlay.position = position;
        }
        if let Some(size) = self.size {
            overlay.size = size;
        }
    }
}

/// Response for a successful delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}
