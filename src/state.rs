//! Shared state injected into every request handler.

use std::sync::Arc;

use crate::application::services::LinkService;

/// Application state cloned into each handler.
///
/// Built once at startup; holds the only handle to the link store.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService>) -> Self {
        Self { link_service }
    }
}
