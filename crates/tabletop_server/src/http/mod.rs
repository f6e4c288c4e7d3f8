//! HTTP boundary.
//!
//! All game endpoints live under `/api` and address a board through the
//! `board_id` query parameter. Bodies are JSON; errors come back as
//! `{"error": ..., "kind": ...}` with a 4xx status.

use crate::session::SessionRegistry;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod handlers;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
}

/// Builds the full router for one server instance.
pub fn router(registry: Arc<SessionRegistry>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/new_board", post(handlers::new_board))
        .route("/api/gamestate", get(handlers::game_state))
        .route("/api/select_color", post(handlers::select_color))
        .route("/api/join", post(handlers::join))
        .route("/api/start_game", post(handlers::start_game))
        .route("/api/move", post(handlers::make_move))
        .route("/api/build", post(handlers::build))
        .route("/api/undo", post(handlers::undo))
        .route("/api/reset", post(handlers::reset))
        .route("/api/heartbeat", post(handlers::heartbeat))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState { registry })
}
