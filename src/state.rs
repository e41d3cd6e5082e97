//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::ShortLinkService;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<ShortLinkService>,
    /// Configured public base URL for short links. When `None`, the base is
    /// derived from each request's `Host` header.
    pub public_base_url: Option<String>,
}

impl AppState {
    pub fn new(link_service: Arc<ShortLinkService>, public_base_url: Option<String>) -> Self {
        Self {
            link_service,
            public_base_url,
        }
    }
}
