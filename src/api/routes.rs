//! API route configuration.

use crate::api::handlers::{
    delete_link_handler, get_link_handler, shorten_handler, stats_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link management routes.
///
/// # Endpoints
///
/// - `POST   /shorten`           - Create a short link (201, also for known URLs)
/// - `GET    /shorten/{code}`    - Resolve a link and count the access
/// - `PUT    /shorten/{code}`    - Point a code at a new URL
/// - `DELETE /shorten/{code}`    - Delete a link
/// - `GET    /statistics/{code}` - Read a link without counting the access
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route(
            "/shorten/{code}",
            get(get_link_handler)
                .put(update_link_handler)
                .delete(delete_link_handler),
        )
        .route("/statistics/{code}", get(stats_handler))
}
