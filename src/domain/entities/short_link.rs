//! ShortLink entity representing a stored key-to-URL mapping.

use chrono::{DateTime, Utc};

/// A stored mapping between a short key and the original URL.
///
/// Records are immutable once created. `id` is assigned by the store and is
/// never exposed to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub id: i64,
    pub original_url: String,
    pub short_key: String,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// Creates a new ShortLink instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_key: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_key,
            created_at,
        }
    }
}

/// Input data for creating a new short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortLink {
    pub original_url: String,
    pub short_key: String,
}

impl NewShortLink {
    pub fn new(original_url: impl Into<String>, short_key: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            short_key: short_key.into(),
        }
    }
}
