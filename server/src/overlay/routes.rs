//! HTTP route handlers for the overlay API

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use metrics::counter;
use serde::Serialize;

use super::types::{DeleteResponse, NewOverlay, Overlay, OverlayError, OverlayId, OverlayPatch};
use crate::protocol::ServerMessage;
use crate::server::AppState;

/// Error response for the overlay API: `{"error": <message>}`
#[derive(Debug, Serialize)]
pub struct OverlayErrorResponse {
    pub error: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl From<OverlayError> for OverlayErrorResponse {
    fn from(e: OverlayError) -> Self {
        let status = match &e {
            OverlayError::InvalidId(_) | OverlayError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            OverlayError::NotFound(_) => StatusCode::NOT_FOUND,
            OverlayError::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            error: e.to_string(),
            status,
        }
    }
}

impl From<JsonRejection> for OverlayErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        OverlayError::MalformedBody(rejection.body_text()).into()
    }
}

impl IntoResponse for OverlayErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

fn log_failure(op: &str, e: &OverlayError) {
    match e {
        OverlayError::StorageUnavailable(_) => tracing::error!("Failed to {} overlay: {}", op, e),
        _ => tracing::debug!("Rejected {} request: {}", op, e),
    }
}

/// POST /api/overlays - Create an overlay
pub async fn create_overlay(
    State(state): State<AppState>,
    body: Result<Json<NewOverlay>, JsonRejection>,
) -> Result<(StatusCode, Json<Overlay>), OverlayErrorResponse> {
    let Json(new_overlay) = body?;

    let overlay = state.repository.insert(new_overlay).await.map_err(|e| {
        log_failure("create", &e);
        OverlayErrorResponse::from(e)
    })?;
    counter!("overlay_mutations_total", "op" => "create").increment(1);
    tracing::debug!("Created overlay {}", overlay.id);

    let response = (StatusCode::CREATED, Json(overlay.clone()));
    state.dispatch(ServerMessage::OverlayCreated(overlay));
    Ok(response)
}

/// GET /api/overlays - List every overlay
pub async fn list_overlays(
    State(state): State<AppState>,
) -> Result<Json<Vec<Overlay>>, OverlayErrorResponse> {
    let overlays = state.repository.find_all().await.map_err(|e| {
        log_failure("list", &e);
        OverlayErrorResponse::from(e)
    })?;

    Ok(Json(overlays))
}

/// PUT /api/overlays/:id - Update the provided fields of an overlay
pub async fn update_overlay(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<OverlayPatch>, JsonRejection>,
) -> Result<Json<Overlay>, OverlayErrorResponse> {
    let id: OverlayId = id.parse()?;
    let Json(patch) = body?;

    let overlay = state
        .repository
        .update_by_id(&id, &patch)
        .await
        .map_err(|e| {
            log_failure("update", &e);
            OverlayErrorResponse::from(e)
        })?;
    counter!("overlay_mutations_total", "op" => "update").increment(1);

    let response = Json(overlay.clone());
    state.dispatch(ServerMessage::OverlayUpdated(overlay));
    Ok(response)
}

/// DELETE /api/overlays/:id - Remove an overlay
pub async fn delete_overlay(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, OverlayErrorResponse> {
    let id: OverlayId = id.parse()?;

    state.repository.delete_by_id(&id).await.map_err(|e| {
        log_failure("delete", &e);
        OverlayErrorResponse::from(e)
    })?;
    counter!("overlay_mutations_total", "op" => "delete").increment(1);

    let response = Json(DeleteResponse {
        message: "Overlay deleted".to_string(),
    });
    state.dispatch(ServerMessage::OverlayDeleted { id });
    Ok(response)
}

/// Build overlay API routes, to be nested under `/api`
pub fn overlay_routes() -> Router<AppState> {
    Router::new()
        .route("/overlays", get(list_overlays).post(create_overlay))
        .route("/overlays/:id", put(update_overlay).delete(delete_overlay))
}
