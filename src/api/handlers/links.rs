//! Handlers for link resolution, update and deletion.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::LinkResponse;
use crate::api::dto::shorten::UpdateLinkRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves a short code and counts the access.
///
/// # Endpoint
///
/// `GET /shorten/{code}`
///
/// Codes match ignoring case and surrounding whitespace.
///
/// # Errors
///
/// Returns 404 Not Found if the code doesn't exist.
pub async fn get_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.resolve(&code).await?;

    Ok(Json(link.into()))
}

/// Points a short code at a new URL.
///
/// # Endpoint
///
/// `PUT /shorten/{code}`
///
/// # Request Body
///
/// ```json
/// { "url": "https://new-destination.com" }
/// ```
///
/// The short code is never changed by this endpoint.
///
/// # Errors
///
/// Returns 404 Not Found if the code doesn't exist.
/// Returns 400 Bad Request if the body or the URL is invalid.
/// Returns 409 Conflict if another code already maps the new URL.
pub async fn update_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateLinkRequest>, JsonRejection>,
) -> Result<Json<LinkResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state.link_service.update(&code, &payload.url).await?;

    Ok(Json(link.into()))
}

/// Permanently deletes a short link.
///
/// # Endpoint
///
/// `DELETE /shorten/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the code doesn't exist.
pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete(&code).await?;

    Ok(StatusCode::NO_CONTENT)
}
