//! In-memory implementation of the URL store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures_util::{StreamExt, stream};
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::{KeyStream, StoreError, UrlStore};

/// Process-local store used when no database is configured, and in tests.
///
/// Inserts go through the DashMap entry API, which holds the shard lock
/// between the existence check and the write, so duplicate keys are rejected
/// atomically even under concurrent inserts. Contents are lost on restart.
#[derive(Debug)]
pub struct InMemoryUrlStore {
    links: DashMap<String, ShortLink>,
    next_id: AtomicI64,
}

impl InMemoryUrlStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            links: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Creates an empty store with room for `capacity` links.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: DashMap::with_capacity(capacity),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryUrlStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlStore for InMemoryUrlStore {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, StoreError> {
        match self.links.entry(new_link.short_key) {
            Entry::Occupied(existing) => Err(StoreError::DuplicateKey(existing.key().clone())),
            Entry::Vacant(slot) => {
                let link = ShortLink::new(
                    self.next_id.fetch_add(1, Ordering::Relaxed),
                    new_link.original_url,
                    slot.key().clone(),
                    Utc::now(),
                );
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find_by_key(&self, short_key: &str) -> Result<Option<ShortLink>, StoreError> {
        Ok(self.links.get(short_key).map(|entry| entry.value().clone()))
    }

    fn list_keys(&self) -> KeyStream {
        // Shard guards cannot be held across awaits, so the keys are copied out.
        let keys: Vec<String> = self.links.iter().map(|entry| entry.key().clone()).collect();

        stream::iter(keys.into_iter().map(Ok)).boxed()
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.links.len() as i64)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
