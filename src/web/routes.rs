//! Route definitions

use super::state::AppState;
use super::{focus_modes, handlers};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/search", post(handlers::search))
        .route("/models", get(handlers::models))
        .route("/discover", get(handlers::discover))
        .route("/stats", get(handlers::stats))
        .route(
            "/focus-modes",
            get(focus_modes::list).post(focus_modes::create),
        )
        .route(
            "/focus-modes/:id",
            get(focus_modes::get)
                .put(focus_modes::update)
                .delete(focus_modes::delete),
        )
        .route("/focus-modes/:id/toggle", post(focus_modes::toggle));

    Router::new()
        // Bare alias of the search endpoint
        .route("/search", post(handlers::search))
        .route("/health", get(handlers::health))
        .nest("/api", api)
        // Add middleware
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Add state
        .with_state(state)
}
