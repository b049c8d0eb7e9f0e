//! Target URL validation.
//!
//! URLs are stored as submitted (minus surrounding whitespace) so that
//! resolution returns exactly what the client sent. Validation only decides
//! whether a URL is acceptable.

use url::Url;

use crate::domain::entities::MAX_URL_LENGTH;

/// Reasons a target URL is rejected.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS URLs are allowed")]
    UnsupportedScheme,

    #[error("URL must include a host")]
    MissingHost,
}

/// Validates a target URL and returns it trimmed.
///
/// # Rules
///
/// 1. Non-empty after trimming, at most [`MAX_URL_LENGTH`] characters
/// 2. Parses as an absolute URL
/// 3. Scheme is `http` or `https`
/// 4. Has a non-empty host
///
/// # Examples
///
/// ```ignore
/// assert_eq!(validate_target_url(" https://example.com/page ").unwrap(), "https://example.com/page");
/// assert!(validate_target_url("ftp://example.com").is_err());
/// assert!(validate_target_url("example.com").is_err());
/// assert!(validate_target_url("http://").is_err());
/// ```
pub fn validate_target_url(input: &str) -> Result<&str, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if trimmed.chars().count() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    let url = Url::parse(trimmed).map_err(|e| match e {
        url::ParseError::EmptyHost => UrlValidationError::MissingHost,
        other => UrlValidationError::InvalidFormat(other.to_string()),
    })?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedScheme),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(trimmed)
}
