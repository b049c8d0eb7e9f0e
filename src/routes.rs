//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `/shorten`, `/shorten/{code}`, `/statistics/{code}` - Link API
//! - `GET /health` - Store health check
//! - `GET /{code}` - Short link redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// All routes with tracing, without path normalization.
///
/// Path normalization has to wrap the router from the outside, so it is
/// applied by [`app_router`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(api::routes::link_routes())
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer())
}
