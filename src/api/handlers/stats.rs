//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::link::LinkResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns a link record without counting the access.
///
/// # Endpoint
///
/// `GET /statistics/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the code doesn't exist.
pub async fn stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.statistics(&code).await?;

    Ok(Json(link.into()))
}
