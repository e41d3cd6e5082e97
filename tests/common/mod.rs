#![allow(dead_code)]

use axum::{
    Router,
    routing::{get, post},
};
use linkforge::api::handlers::{health_handler, keys_handler, redirect_handler, shorten_handler};
use linkforge::application::services::{DEFAULT_MAX_ATTEMPTS, ShortLinkService};
use linkforge::domain::repositories::UrlStore;
use linkforge::error::AppError;
use linkforge::infrastructure::persistence::InMemoryUrlStore;
use linkforge::state::AppState;
use linkforge::utils::key_generator::{KeyGenerator, RandomKeyGenerator};
use std::sync::Arc;

pub const BASE_URL: &str = "http://localhost:8080/api/url/";

/// Generator that always returns the same key.
pub struct FixedKeyGenerator(pub &'static str);

impl KeyGenerator for FixedKeyGenerator {
    fn generate(&self) -> Result<String, AppError> {
        Ok(self.0.to_string())
    }
}

pub fn create_test_state_with(
    store: Arc<dyn UrlStore>,
    generator: Arc<dyn KeyGenerator>,
    max_attempts: usize,
    base_url: Option<&str>,
) -> AppState {
    let link_service = Arc::new(ShortLinkService::new(store, generator, max_attempts));
    AppState::new(link_service, base_url.map(str::to_string))
}

pub fn create_test_state(base_url: Option<&str>) -> AppState {
    create_test_state_with(
        Arc::new(InMemoryUrlStore::new()),
        Arc::new(RandomKeyGenerator::new()),
        DEFAULT_MAX_ATTEMPTS,
        base_url,
    )
}

/// All routes, without the middleware stack.
pub fn create_test_app(state: AppState) -> Router {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/keys", get(keys_handler))
        .route("/health", get(health_handler))
        .route("/{short_key}", get(redirect_handler))
        .with_state(state)
}

pub fn short_key_of(short_url: &str) -> &str {
    short_url.rsplit('/').next().unwrap()
}

pub fn is_url_safe(key: &str) -> bool {
    key.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
