//! Repository trait for link record storage.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::json;

/// Store owning link records.
///
/// Codes and URLs are matched case-insensitively; lookups by code trim
/// surrounding whitespace from the input first.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new link with `access_count = 0` and both timestamps set to now.
    ///
    /// If another link already maps the same URL (ignoring case), that link is
    /// returned instead and nothing is inserted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken.
    /// Returns [`AppError::StoreUnavailable`] on storage errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by its target URL.
    async fn find_by_url(&self, url: &str) -> Result<Option<Link>, AppError>;

    /// Increments `access_count` by one and refreshes `updated_at`.
    ///
    /// The read and the increment happen atomically. Returns the updated
    /// link, or `None` if the code is unknown.
    async fn record_access(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Replaces the target URL of a link and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches `code`.
    /// Returns [`AppError::Conflict`] if another link already maps `url`.
    async fn update(&self, code: &str, url: &str) -> Result<Link, AppError>;

    /// Permanently removes a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches `code`.
    async fn delete(&self, code: &str) -> Result<(), AppError>;

    /// Lists links, newest first.
    ///
    /// `page` is 1-indexed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if the page offset does not fit in an `i64`.
    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<Link>, AppError>;

    /// Counts stored links.
    async fn count(&self) -> Result<i64, AppError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Row offset of a 1-indexed page.
///
/// # Errors
///
/// Returns [`AppError::InvalidInput`] if the offset overflows.
pub fn page_offset(page: i64, page_size: i64) -> Result<i64, AppError> {
    page.saturating_sub(1)
        .max(0)
        .checked_mul(page_size)
        .ok_or_else(|| {
            AppError::invalid_input(
                "Page is out of range",
                json!({ "page": page, "page_size": page_size }),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 25).unwrap(), 0);
        assert_eq!(page_offset(3, 25).unwrap(), 50);
    }

    #[test]
    fn test_page_offset_overflow_is_invalid_input() {
        assert!(matches!(
            page_offset(i64::MAX, 100),
            Err(AppError::InvalidInput { .. })
        ));
    }
}
