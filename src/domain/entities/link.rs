//! Link entity representing a short code to target URL mapping.

use chrono::{DateTime, Utc};

/// Default length of generated short codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Upper bound on short code length.
pub const MAX_CODE_LENGTH: usize = 12;

/// Upper bound on target URL length, in characters.
pub const MAX_URL_LENGTH: usize = 2048;

/// A persisted link record.
///
/// `short_code` is unique ignoring case and never changes after creation.
/// `updated_at` moves forward on every mutation, including access counting.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub access_count: i64,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        url: String,
        short_code: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        access_count: i64,
    ) -> Self {
        Self {
            id,
            url,
            short_code,
            created_at,
            updated_at,
            access_count,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub url: String,
    pub short_code: String,
}
