//! Link lifecycle service: creation, resolution, update and deletion.

use std::sync::Arc;

use metrics::counter;
use serde_json::json;
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, info, warn};

use crate::domain::entities::{DEFAULT_CODE_LENGTH, Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_validator::validate_target_url;

/// Tuning knobs for short code allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorSettings {
    /// Length of generated codes.
    pub code_length: usize,
    /// Candidates tried against the store before giving up.
    pub max_attempts: usize,
    /// Inserts tried when the store reports a code conflict.
    pub max_insert_attempts: usize,
}

impl Default for AllocatorSettings {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            max_attempts: 64,
            max_insert_attempts: 5,
        }
    }
}

/// Result of a shorten request.
#[derive(Debug, Clone)]
pub struct ShortenOutcome {
    pub link: Link,
    /// `false` when an existing link for the same URL was returned.
    pub created: bool,
}

/// Service owning the link record lifecycle.
///
/// Validates input before any mutation, deduplicates by URL, and allocates
/// collision-free short codes.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    generator: CodeGenerator,
    settings: AllocatorSettings,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        generator: CodeGenerator,
        settings: AllocatorSettings,
    ) -> Self {
        Self {
            repository,
            generator,
            settings,
        }
    }

    /// Shortens a URL.
    ///
    /// # Flow
    ///
    /// 1. Reject URLs that are not `http`/`https` or lack a host
    /// 2. Return the existing link if the URL is already mapped (ignoring case)
    /// 3. Allocate a free code and insert; on a code conflict from the store,
    ///    allocate again and retry
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] for unacceptable URLs.
    /// Returns [`AppError::CodeSpaceExhausted`] if no free code could be found.
    /// Returns [`AppError::Conflict`] if every insert attempt collided.
    pub async fn shorten(&self, url: &str) -> Result<ShortenOutcome, AppError> {
        let url = validate_url(url)?;

        if let Some(existing) = self.repository.find_by_url(url).await? {
            debug!(code = %existing.short_code, "URL already shortened");
            return Ok(ShortenOutcome {
                link: existing,
                created: false,
            });
        }

        let retries = self.settings.max_insert_attempts.saturating_sub(1);
        let strategy = FixedInterval::from_millis(0).take(retries);

        RetryIf::spawn(
            strategy,
            || self.try_create(url),
            |e: &AppError| {
                let conflict = matches!(e, AppError::Conflict { .. });
                if conflict {
                    counter!("code_collisions_total").increment(1);
                    warn!("Short code taken at insert time, allocating another");
                }
                conflict
            },
        )
        .await
    }

    /// Resolves a code and counts the access.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        let link = self
            .repository
            .record_access(code)
            .await?
            .ok_or_else(|| not_found(code))?;

        counter!("links_resolved_total").increment(1);
        Ok(link)
    }

    /// Returns a link without counting the access.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn statistics(&self, code: &str) -> Result<Link, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| not_found(code))
    }

    /// Points an existing code at a new URL.
    ///
    /// The short code itself never changes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] for unacceptable URLs.
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn update(&self, code: &str, url: &str) -> Result<Link, AppError> {
        let url = validate_url(url)?;
        let link = self.repository.update(code, url).await?;

        info!(code = %link.short_code, "Link updated");
        Ok(link)
    }

    /// Permanently deletes a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn delete(&self, code: &str) -> Result<(), AppError> {
        self.repository.delete(code).await?;

        info!(code = code.trim(), "Link deleted");
        Ok(())
    }

    /// Lists links, newest first. `page` is 1-indexed.
    pub async fn list(&self, page: i64, page_size: i64) -> Result<Vec<Link>, AppError> {
        if page < 1 || page_size < 1 {
            return Err(AppError::invalid_input(
                "Page and page size must be positive",
                json!({ "page": page, "page_size": page_size }),
            ));
        }

        self.repository.list(page, page_size).await
    }

    /// Counts stored links.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Checks that the store is reachable.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Allocates a code and inserts the link once.
    async fn try_create(&self, url: &str) -> Result<ShortenOutcome, AppError> {
        let code = self.allocate_unique_code().await?;

        let link = self
            .repository
            .create(NewLink {
                url: url.to_string(),
                short_code: code.clone(),
            })
            .await?;

        // A concurrent request may have mapped the same URL first.
        let created = link.short_code == code;
        if created {
            counter!("links_created_total").increment(1);
            info!(code = %link.short_code, id = link.id, "Link created");
        }

        Ok(ShortenOutcome { link, created })
    }

    /// Generates candidates until one is not in use.
    ///
    /// Two codes differing only by case count as the same code.
    async fn allocate_unique_code(&self) -> Result<String, AppError> {
        for attempt in 1..=self.settings.max_attempts {
            let code = self.generator.generate(self.settings.code_length)?;

            if self.repository.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }

            counter!("code_collisions_total").increment(1);
            debug!(attempt, "Generated code already in use");
        }

        Err(AppError::code_space_exhausted(
            "Failed to allocate a unique short code",
            json!({
                "attempts": self.settings.max_attempts,
                "code_length": self.settings.code_length,
            }),
        ))
    }
}

fn validate_url(url: &str) -> Result<&str, AppError> {
    validate_target_url(url)
        .map_err(|e| AppError::invalid_input(e.to_string(), json!({ "field": "url" })))
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code.trim() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::utils::code_generator::RandomSource;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Fills every call with one byte value, incrementing per call:
    /// the first code is all `A`, the second all `B`, and so on.
    struct StepRandom(Mutex<u8>);

    impl RandomSource for StepRandom {
        fn fill(&self, buf: &mut [u8]) -> Result<(), AppError> {
            let mut next = self.0.lock().unwrap();
            buf.fill(*next);
            *next += 1;
            Ok(())
        }
    }

    fn step_generator() -> CodeGenerator {
        CodeGenerator::new(Arc::new(StepRandom(Mutex::new(0))))
    }

    fn create_test_link(id: i64, code: &str, url: &str, access_count: i64) -> Link {
        let now = Utc::now();
        Link::new(
            id,
            url.to_string(),
            code.to_string(),
            now,
            now,
            access_count,
        )
    }

    fn service(repo: MockLinkRepository) -> LinkService {
        LinkService::new(
            Arc::new(repo),
            step_generator(),
            AllocatorSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_shorten_creates_new_link() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_url()
            .withf(|url| url == "https://example.com/page")
            .times(1)
            .returning(|_| Ok(None));

        repo.expect_find_by_code()
            .withf(|code| code == "AAAAAA")
            .times(1)
            .returning(|_| Ok(None));

        repo.expect_create()
            .withf(|new_link| {
                new_link.short_code == "AAAAAA" && new_link.url == "https://example.com/page"
            })
            .times(1)
            .returning(|new_link| {
                Ok(create_test_link(1, &new_link.short_code, &new_link.url, 0))
            });

        let outcome = service(repo)
            .shorten("https://example.com/page")
            .await
            .unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.link.short_code, "AAAAAA");
        assert_eq!(outcome.link.access_count, 0);
    }

    #[tokio::test]
    async fn test_shorten_returns_existing_link_for_same_url() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_url()
            .times(1)
            .returning(|_| Ok(Some(create_test_link(5, "exist1", "https://example.com", 3))));
        repo.expect_create().times(0);
        repo.expect_find_by_code().times(0);

        let outcome = service(repo).shorten("https://example.com").await.unwrap();

        assert!(!outcome.created);
        assert_eq!(outcome.link.id, 5);
        assert_eq!(outcome.link.short_code, "exist1");
        assert_eq!(outcome.link.access_count, 3);
    }

    #[tokio::test]
    async fn test_shorten_rejects_unsupported_scheme_before_store_access() {
        let repo = MockLinkRepository::new();

        let result = service(repo).shorten("ftp://example.com").await;

        assert!(matches!(result, Err(AppError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_shorten_rejects_missing_scheme_and_host() {
        let svc = service(MockLinkRepository::new());

        assert!(matches!(
            svc.shorten("example.com").await,
            Err(AppError::InvalidInput { .. })
        ));
        assert!(matches!(
            svc.shorten("http://").await,
            Err(AppError::InvalidInput { .. })
        ));
    }

    #[tokio::test]
    async fn test_allocator_skips_codes_in_use() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_url().returning(|_| Ok(None));
        repo.expect_find_by_code()
            .times(3)
            .returning(|code| match code {
                "AAAAAA" | "BBBBBB" => Ok(Some(create_test_link(1, code, "https://taken.com", 0))),
                _ => Ok(None),
            });
        repo.expect_create()
            .withf(|new_link| new_link.short_code == "CCCCCC")
            .times(1)
            .returning(|new_link| {
                Ok(create_test_link(2, &new_link.short_code, &new_link.url, 0))
            });

        let outcome = service(repo).shorten("https://example.com").await.unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.link.short_code, "CCCCCC");
    }

    #[tokio::test]
    async fn test_allocator_gives_up_after_max_attempts() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_url().returning(|_| Ok(None));
        repo.expect_find_by_code()
            .times(3)
            .returning(|code| Ok(Some(create_test_link(1, code, "https://taken.com", 0))));
        repo.expect_create().times(0);

        let svc = LinkService::new(
            Arc::new(repo),
            step_generator(),
            AllocatorSettings {
                max_attempts: 3,
                ..AllocatorSettings::default()
            },
        );

        let result = svc.shorten("https://example.com").await;

        assert!(matches!(result, Err(AppError::CodeSpaceExhausted { .. })));
    }

    #[tokio::test]
    async fn test_insert_conflict_retries_with_fresh_code() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_url().returning(|_| Ok(None));
        repo.expect_find_by_code().times(2).returning(|_| Ok(None));

        let mut seq = mockall::Sequence::new();
        repo.expect_create()
            .withf(|new_link| new_link.short_code == "AAAAAA")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::conflict("Unique constraint violation", json!({}))));
        repo.expect_create()
            .withf(|new_link| new_link.short_code == "BBBBBB")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_link| {
                Ok(create_test_link(7, &new_link.short_code, &new_link.url, 0))
            });

        let outcome = service(repo).shorten("https://example.com").await.unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.link.short_code, "BBBBBB");
    }

    #[tokio::test]
    async fn test_insert_conflict_exhausts_insert_attempts() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_url().returning(|_| Ok(None));
        repo.expect_find_by_code().times(2).returning(|_| Ok(None));
        repo.expect_create()
            .times(2)
            .returning(|_| Err(AppError::conflict("Unique constraint violation", json!({}))));

        let svc = LinkService::new(
            Arc::new(repo),
            step_generator(),
            AllocatorSettings {
                max_insert_attempts: 2,
                ..AllocatorSettings::default()
            },
        );

        let result = svc.shorten("https://example.com").await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_store_error_is_not_retried() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_url().returning(|_| Ok(None));
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));
        repo.expect_create()
            .times(1)
            .returning(|_| Err(AppError::store_unavailable("Database error", json!({}))));

        let result = service(repo).shorten("https://example.com").await;

        assert!(matches!(result, Err(AppError::StoreUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_shorten_reports_url_race_winner_as_not_created() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_url().returning(|_| Ok(None));
        repo.expect_find_by_code().returning(|_| Ok(None));
        repo.expect_create()
            .times(1)
            .returning(|new_link| Ok(create_test_link(3, "winner", &new_link.url, 0)));

        let outcome = service(repo).shorten("https://example.com").await.unwrap();

        assert!(!outcome.created);
        assert_eq!(outcome.link.short_code, "winner");
    }

    #[tokio::test]
    async fn test_resolve_counts_access() {
        let mut repo = MockLinkRepository::new();

        repo.expect_record_access()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|code| Ok(Some(create_test_link(1, code, "https://example.com", 1))));

        let link = service(repo).resolve("abc123").await.unwrap();

        assert_eq!(link.access_count, 1);
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_record_access().returning(|_| Ok(None));

        let result = service(repo).resolve("missing").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_statistics_does_not_count_access() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_code()
            .times(1)
            .returning(|code| Ok(Some(create_test_link(1, code, "https://example.com", 4))));
        repo.expect_record_access().times(0);

        let link = service(repo).statistics("abc123").await.unwrap();

        assert_eq!(link.access_count, 4);
    }

    #[tokio::test]
    async fn test_statistics_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().returning(|_| Ok(None));

        let result = service(repo).statistics("missing").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_replaces_url_not_code() {
        let mut repo = MockLinkRepository::new();

        repo.expect_update()
            .withf(|code, url| code == "abc123" && url == "https://new.example.com")
            .times(1)
            .returning(|code, url| Ok(create_test_link(1, code, url, 0)));

        let link = service(repo)
            .update("abc123", " https://new.example.com ")
            .await
            .unwrap();

        assert_eq!(link.short_code, "abc123");
        assert_eq!(link.url, "https://new.example.com");
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_url() {
        let mut repo = MockLinkRepository::new();
        repo.expect_update().times(0);

        let result = service(repo).update("abc123", "ftp://example.com").await;

        assert!(matches!(result, Err(AppError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_delete_propagates_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete()
            .returning(|code| Err(not_found(code)));

        let result = service(repo).delete("missing").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_rejects_non_positive_page() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list().times(0);

        let result = service(repo).list(0, 20).await;

        assert!(matches!(result, Err(AppError::InvalidInput { .. })));
    }
}
