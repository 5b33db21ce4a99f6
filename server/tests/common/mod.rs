//! Common Test Utilities for Integration Tests
//!
//! Shared helpers used across integration test modules.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use overlay_server::overlay::{
    NewOverlay, Overlay, OverlayError, OverlayId, OverlayPatch, OverlayRepository,
};
use overlay_server::{AppState, Broadcaster, InMemoryOverlayRepository, build_router};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Create a test application backed by an in-memory repository, with realtime enabled
pub fn create_test_app_with_state() -> (Router, AppState, Arc<InMemoryOverlayRepository>) {
    let repository = Arc::new(InMemoryOverlayRepository::new());
    let app_state = AppState::new(repository.clone()).with_broadcaster(Broadcaster::new(32));
    (build_router(app_state.clone()), app_state, repository)
}

/// Create a test application with realtime enabled
pub fn create_test_app() -> Router {
    create_test_app_with_state().0
}

/// Create a test application without the realtime layer
pub fn create_test_app_without_realtime() -> Router {
    build_router(AppState::new(Arc::new(InMemoryOverlayRepository::new())))
}

/// Send a request and decode the JSON response body (Null when empty)
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// POST an overlay and return the created document
pub async fn create_overlay(app: &Router, body: Value) -> Value {
    let (status, json) = send(app, json_request("POST", "/api/overlays", &body)).await;
    assert_eq!(status, StatusCode::CREATED);
    json
}

pub async fn list_overlays(app: &Router) -> Vec<Value> {
    let (status, json) = send(app, empty_request("GET", "/api/overlays")).await;
    assert_eq!(status, StatusCode::OK);
    json.as_array().cloned().unwrap()
}

/// Repository whose every call fails as if the database were down
pub struct UnavailableRepository;

#[async_trait]
impl OverlayRepository for UnavailableRepository {
    async fn insert(&self, _overlay: NewOverlay) -> Result<Overlay, OverlayError> {
        Err(OverlayError::StorageUnavailable("connection refused".into()))
    }

    async fn find_all(&self) -> Result<Vec<Overlay>, OverlayError> {
        Err(OverlayError::StorageUnavailable("connection refused".into()))
    }

    async fn update_by_id(
        &self,
        _id: &OverlayId,
        _patch: &OverlayPatch,
    ) -> Result<Overlay, OverlayError> {
        Err(OverlayError::StorageUnavailable("connection refused".into()))
    }

    async fn delete_by_id(&self, _id: &OverlayId) -> Result<(), OverlayError> {
        Err(OverlayError::StorageUnavailable("connection refused".into()))
    }

    async fn ping(&self) -> Result<(), OverlayError> {
        Err(OverlayError::StorageUnavailable("connection refused".into()))
    }
}

/// Initialize test logging for detailed output
pub fn init_test_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "overlay_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
