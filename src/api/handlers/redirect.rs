//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Counts as a resolution: the access counter is incremented exactly as for
/// `GET /shorten/{code}`.
///
/// # Errors
///
/// Returns 404 Not Found if the code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let link = state.link_service.resolve(&code).await?;

    debug!(code = %link.short_code, "Redirecting");
    Ok(Redirect::temporary(&link.url))
}
