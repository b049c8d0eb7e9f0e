//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::LinkResponse;
use crate::api::dto::shorten::ShortenRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/page" }
/// ```
///
/// # Deduplication
///
/// Submitting a URL that is already mapped (ignoring case) returns the
/// existing record. The response is `201 Created` in both cases.
///
/// # Errors
///
/// Returns 400 Bad Request if the body is not a JSON `{"url": ...}` object,
/// or the URL is malformed, is not `http`/`https`, or has no host.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let outcome = state.link_service.shorten(&payload.url).await?;

    Ok((StatusCode::CREATED, Json(outcome.link.into())))
}
