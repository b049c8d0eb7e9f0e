//! DTOs for link creation and update.

use serde::Deserialize;
use validator::Validate;

/// Request body for `POST /shorten`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to shorten (must be HTTP/HTTPS with a host).
    #[validate(length(min = 1, max = 2048), url(message = "Invalid URL format"))]
    pub url: String,
}

/// Request body for `PUT /shorten/{code}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    /// New destination URL for this code.
    #[validate(length(min = 1, max = 2048), url(message = "Invalid URL format"))]
    pub url: String,
}
