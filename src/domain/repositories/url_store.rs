//! Store contract for short links.

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use thiserror::Error;

use crate::domain::entities::{NewShortLink, ShortLink};

/// Errors raised by [`UrlStore`] implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("short key already exists: {0}")]
    DuplicateKey(String),
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("store query failed: {0}")]
    Query(String),
}

/// Lazy, single-use sequence of every stored short key.
///
/// Order is unspecified. The stream owns whatever it needs from the store, so it
/// can outlive the call that produced it (e.g. be handed to a response body).
pub type KeyStream = BoxStream<'static, Result<String, StoreError>>;

/// Persistence contract for [`ShortLink`] records.
///
/// The store, not the caller, guarantees key uniqueness: concurrent inserts of
/// the same key must result in exactly one success and
/// [`StoreError::DuplicateKey`] for the others.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlStore`] - PostgreSQL
/// - [`crate::infrastructure::persistence::InMemoryUrlStore`] - process memory
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Persists a new link.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] if `new_link.short_key` is taken.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, StoreError>;

    /// Exact-match lookup by short key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(link))` if found
    /// - `Ok(None)` if no record has this key
    async fn find_by_key(&self, short_key: &str) -> Result<Option<ShortLink>, StoreError>;

    /// Streams every stored short key without materializing the whole set.
    fn list_keys(&self) -> KeyStream;

    /// Number of stored links.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Returns `true` if the backend answers.
    async fn health_check(&self) -> bool;
}
