//! Link record representation returned by the API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Link;

/// JSON body describing a link record.
///
/// ```json
/// {
///   "id": 1,
///   "url": "https://example.com/page",
///   "shortCode": "aB3xZ9",
///   "createdAt": "2025-01-01T12:00:00.000000Z",
///   "updatedAt": "2025-01-01T12:00:00.000000Z",
///   "accessCount": 0
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: i64,
    pub url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub access_count: i64,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            url: link.url,
            short_code: link.short_code,
            created_at: link.created_at,
            updated_at: link.updated_at,
            access_count: link.access_count,
        }
    }
}
