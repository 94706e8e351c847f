use super::handlers;
use super::state::AppState;
use crate::config::HttpConfig;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Default request body limit when no HTTP config is supplied
const DEFAULT_BODY_LIMIT: usize = 64 * 1024 * 1024;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    api_router(state, DEFAULT_BODY_LIMIT)
}

/// Create the router configured from `[service.http]`: body limit, CORS and
/// an optional static front-end
pub fn create_router_with_config(state: AppState, http: &HttpConfig) -> Router {
    let mut router = api_router(state, http.max_body_bytes);

    if let Some(dir) = &http.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }
    if http.cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

fn api_router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Text
        .route("/api/split", post(handlers::split_text))
        // Recordings and exports
        .route("/api/save_audio", post(handlers::save_audio))
        .route("/api/export_individual", post(handlers::export_individual))
        .route("/api/export_combined", post(handlers::export_combined))
        .route("/api/export_all", post(handlers::export_all))
        .layer(DefaultBodyLimit::max(body_limit))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
