//! Process-local implementation of link repository.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, page_offset};
use crate::error::AppError;

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    links: BTreeMap<i64, Link>,
    /// Lowercased code -> id.
    by_code: HashMap<String, i64>,
    /// Lowercased URL -> id.
    by_url: HashMap<String, i64>,
}

impl State {
    fn id_for_code(&self, code: &str) -> Option<i64> {
        self.by_code.get(&code.trim().to_lowercase()).copied()
    }
}

/// In-memory link store with the same uniqueness rules as the PostgreSQL
/// schema.
///
/// All indexes live behind one lock, so every operation is atomic.
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryLinkRepository {
    state: RwLock<State>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut state = self.state.write().await;

        let url_key = new_link.url.to_lowercase();
        if let Some(id) = state.by_url.get(&url_key) {
            return Ok(state.links[id].clone());
        }

        let code_key = new_link.short_code.to_lowercase();
        if state.by_code.contains_key(&code_key) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_short_code_lower_key" }),
            ));
        }

        state.next_id += 1;
        let id = state.next_id;
        let now = Utc::now();
        let link = Link::new(id, new_link.url, new_link.short_code, now, now, 0);

        state.by_code.insert(code_key, id);
        state.by_url.insert(url_key, id);
        state.links.insert(id, link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let state = self.state.read().await;

        Ok(state
            .id_for_code(code)
            .and_then(|id| state.links.get(&id))
            .cloned())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Link>, AppError> {
        let state = self.state.read().await;

        Ok(state
            .by_url
            .get(&url.to_lowercase())
            .and_then(|id| state.links.get(id))
            .cloned())
    }

    async fn record_access(&self, code: &str) -> Result<Option<Link>, AppError> {
        let mut state = self.state.write().await;

        let Some(id) = state.id_for_code(code) else {
            return Ok(None);
        };

        Ok(state.links.get_mut(&id).map(|link| {
            link.access_count += 1;
            link.updated_at = Utc::now().max(link.created_at);
            link.clone()
        }))
    }

    async fn update(&self, code: &str, url: &str) -> Result<Link, AppError> {
        let mut state = self.state.write().await;

        let id = state.id_for_code(code).ok_or_else(|| {
            AppError::not_found("Short link not found", json!({ "code": code.trim() }))
        })?;

        let new_key = url.to_lowercase();
        if state.by_url.get(&new_key).is_some_and(|&owner| owner != id) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_url_lower_key" }),
            ));
        }

        let link = state
            .links
            .get_mut(&id)
            .ok_or_else(|| AppError::internal("Link index out of sync", json!({ "id": id })))?;
        let old_key = link.url.to_lowercase();
        link.url = url.to_string();
        link.updated_at = Utc::now().max(link.created_at);
        let updated = link.clone();

        state.by_url.remove(&old_key);
        state.by_url.insert(new_key, id);

        Ok(updated)
    }

    async fn delete(&self, code: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;

        let id = state.id_for_code(code).ok_or_else(|| {
            AppError::not_found("Short link not found", json!({ "code": code.trim() }))
        })?;

        if let Some(link) = state.links.remove(&id) {
            state.by_code.remove(&link.short_code.to_lowercase());
            state.by_url.remove(&link.url.to_lowercase());
        }

        Ok(())
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<Link>, AppError> {
        let state = self.state.read().await;
        let offset = usize::try_from(page_offset(page, page_size)?).unwrap_or(usize::MAX);
        let limit = usize::try_from(page_size).unwrap_or(0);

        // Ids are assigned in creation order.
        Ok(state
            .links
            .values()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let state = self.state.read().await;
        Ok(state.links.len() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
