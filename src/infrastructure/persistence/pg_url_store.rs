//! PostgreSQL implementation of the URL store.

use async_stream::stream;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::{KeyStream, StoreError, UrlStore};

/// PostgreSQL store backed by the `url_store` table.
///
/// Key uniqueness is enforced by the `url_store_short_key_key` unique
/// constraint, so concurrent inserts of the same key cannot both succeed.
pub struct PgUrlStore {
    pool: Arc<PgPool>,
}

#[derive(sqlx::FromRow)]
struct ShortLinkRow {
    id: i64,
    original_url: String,
    short_key: String,
    created_at: DateTime<Utc>,
}

impl From<ShortLinkRow> for ShortLink {
    fn from(row: ShortLinkRow) -> Self {
        ShortLink::new(row.id, row.original_url, row.short_key, row.created_at)
    }
}

impl PgUrlStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn map_sqlx_error(err: sqlx::Error, short_key: Option<&str>) -> StoreError {
    if let Some(db) = err.as_database_error()
        && db.is_unique_violation()
    {
        return StoreError::DuplicateKey(short_key.unwrap_or_default().to_string());
    }

    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StoreError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_) => StoreError::InvalidData(message),
        _ => StoreError::Query(message),
    }
}

#[async_trait]
impl UrlStore for PgUrlStore {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, StoreError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            INSERT INTO url_store (original_url, short_key)
            VALUES ($1, $2)
            RETURNING id, original_url, short_key, created_at
            "#,
        )
        .bind(&new_link.original_url)
        .bind(&new_link.short_key)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error(e, Some(new_link.short_key.as_str())))?;

        Ok(row.into())
    }

    async fn find_by_key(&self, short_key: &str) -> Result<Option<ShortLink>, StoreError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT id, original_url, short_key, created_at
            FROM url_store
            WHERE short_key = $1
            "#,
        )
        .bind(short_key)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error(e, None))?;

        Ok(row.map(ShortLink::from))
    }

    fn list_keys(&self) -> KeyStream {
        let pool = Arc::clone(&self.pool);

        stream! {
            let mut rows = sqlx::query_scalar::<_, String>("SELECT short_key FROM url_store")
                .fetch(pool.as_ref());

            while let Some(row) = rows.next().await {
                yield row.map_err(|e| map_sqlx_error(e, None));
            }
        }
        .boxed()
    }

    async fn count(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM url_store")
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| map_sqlx_error(e, None))
    }

    async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await
            .is_ok()
    }
}
