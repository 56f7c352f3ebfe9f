//! Route definitions.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::handlers;

/// Token and connection routes, relative to the base path.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/connect", get(handlers::connect))
        .route("/status", get(handlers::status))
        .route(
            "/tokens",
            get(handlers::list_tokens).post(handlers::create_token),
        )
        .route("/tokens/revoke", post(handlers::revoke_token))
}

/// Builds the complete router with every route mounted under `base_path`.
///
/// An empty `base_path` mounts the routes at the root.
pub fn build_router(state: Arc<AppState>, base_path: &str) -> Router {
    let router = if base_path.is_empty() {
        Router::new().merge(api_routes())
    } else {
        Router::new().nest(base_path, api_routes())
    };

    router
        .fallback(handlers::not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
