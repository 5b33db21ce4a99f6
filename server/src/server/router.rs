//! Router construction

use axum::{Json, Router, routing::get};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::{AppState, websocket::ws_handler};
use crate::overlay::overlay_routes;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness probe; does not touch storage
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
    })
}

/// Build the application router.
///
/// - `GET /health`
/// - `GET|POST /api/overlays`
/// - `PUT|DELETE /api/overlays/:id`
/// - `GET /ws` (only when realtime is enabled)
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(health))
        .nest("/api", overlay_routes());

    if state.broadcaster.is_some() {
        router = router.route("/ws", get(ws_handler));
    }

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
