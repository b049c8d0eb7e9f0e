//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, page_offset};
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, url, short_code, created_at, updated_at, access_count";

/// PostgreSQL repository for link records.
///
/// Case-insensitive matching relies on the `LOWER(short_code)` and
/// `md5(LOWER(url))` unique indexes created by the migrations. URL lookups
/// use the same expression so they hit the index.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut tx = self.pool.begin().await?;

        // A code collision still raises a unique violation; only the URL
        // index is absorbed here.
        let inserted = sqlx::query_as::<_, Link>(&format!(
            r#"
            INSERT INTO links (url, short_code)
            VALUES ($1, $2)
            ON CONFLICT ((md5(LOWER(url)))) DO NOTHING
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(&new_link.url)
        .bind(&new_link.short_code)
        .fetch_optional(&mut *tx)
        .await?;

        let link = match inserted {
            Some(link) => link,
            None => sqlx::query_as::<_, Link>(&format!(
                "SELECT {LINK_COLUMNS} FROM links WHERE md5(LOWER(url)) = md5(LOWER($1))"
            ))
            .bind(&new_link.url)
            .fetch_one(&mut *tx)
            .await?,
        };

        tx.commit().await?;
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let link = sqlx::query_as::<_, Link>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE LOWER(short_code) = LOWER($1)"
        ))
        .bind(code.trim())
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Link>, AppError> {
        let link = sqlx::query_as::<_, Link>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE md5(LOWER(url)) = md5(LOWER($1))"
        ))
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn record_access(&self, code: &str) -> Result<Option<Link>, AppError> {
        // Single statement: the row lock serializes concurrent increments.
        let link = sqlx::query_as::<_, Link>(&format!(
            r#"
            UPDATE links
            SET access_count = access_count + 1,
                updated_at = GREATEST(NOW(), created_at)
            WHERE LOWER(short_code) = LOWER($1)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(code.trim())
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn update(&self, code: &str, url: &str) -> Result<Link, AppError> {
        let code = code.trim();

        sqlx::query_as::<_, Link>(&format!(
            r#"
            UPDATE links
            SET url = $2,
                updated_at = GREATEST(NOW(), created_at)
            WHERE LOWER(short_code) = LOWER($1)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(code)
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    async fn delete(&self, code: &str) -> Result<(), AppError> {
        let code = code.trim();

        let result = sqlx::query("DELETE FROM links WHERE LOWER(short_code) = LOWER($1)")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "code": code }),
            ));
        }

        Ok(())
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<Link>, AppError> {
        let offset = page_offset(page, page_size)?;

        let links = sqlx::query_as::<_, Link>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(page_size)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
