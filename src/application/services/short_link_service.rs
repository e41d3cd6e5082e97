//! Short link creation, resolution and listing.

use std::sync::Arc;

use futures_util::StreamExt;
use serde_json::json;
use tracing::{debug, trace, warn};

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::{KeyStream, StoreError, UrlStore};
use crate::error::AppError;
use crate::utils::key_generator::KeyGenerator;

/// Default number of key generation attempts per create request.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Orchestrates key generation and the store for the three request flows.
///
/// Holds no mutable state; concurrent calls are independent and rely on the
/// store for key uniqueness.
pub struct ShortLinkService {
    store: Arc<dyn UrlStore>,
    generator: Arc<dyn KeyGenerator>,
    max_attempts: usize,
}

impl ShortLinkService {
    /// Creates a new service.
    ///
    /// `max_attempts` is clamped to at least 1. With 1, a key collision is
    /// reported as a conflict without regenerating.
    pub fn new(
        store: Arc<dyn UrlStore>,
        generator: Arc<dyn KeyGenerator>,
        max_attempts: usize,
    ) -> Self {
        Self {
            store,
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Stores `original_url` under a freshly generated key.
    ///
    /// The URL is stored verbatim. URLs containing control characters are
    /// refused, since they could never be sent back in a `Location` header.
    /// If the store rejects a key as a duplicate, a
    /// new key is generated, up to `max_attempts` attempts in total. The existing
    /// record is never overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `original_url` contains a control character.
    /// Returns [`AppError::Conflict`] if every attempt hit an existing key.
    /// Returns [`AppError::Internal`] on key generation or store failures, which
    /// are not retried.
    pub async fn create(&self, original_url: String) -> Result<ShortLink, AppError> {
        if let Some(position) = original_url.find(char::is_control) {
            return Err(AppError::bad_request(
                "originalUrl must not contain control characters",
                json!({ "position": position }),
            ));
        }

        let mut last_conflict = None;

        for attempt in 1..=self.max_attempts {
            let short_key = self.generator.generate()?;
            let new_link = NewShortLink::new(original_url.clone(), short_key);

            match self.store.insert(new_link).await {
                Ok(link) => {
                    debug!(short_key = %link.short_key, attempt, "Short link created");
                    return Ok(link);
                }
                Err(StoreError::DuplicateKey(key)) => {
                    warn!(short_key = %key, attempt, max_attempts = self.max_attempts, "Duplicate key detected");
                    last_conflict = Some(StoreError::DuplicateKey(key));
                }
                Err(e) => return Err(e.into()),
            }
        }

        match last_conflict {
            Some(conflict) => Err(conflict.into()),
            None => Err(AppError::internal(
                "Failed to generate short key",
                json!({ "attempts": self.max_attempts }),
            )),
        }
    }

    /// Looks up the original URL for `short_key`.
    ///
    /// Any string is accepted; malformed keys simply are not found.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on a hit
    /// - `Ok(None)` if no link has this key
    pub async fn resolve(&self, short_key: &str) -> Result<Option<String>, AppError> {
        let link = self.store.find_by_key(short_key).await?;

        match &link {
            Some(link) => debug!(short_key, original_url = %link.original_url, "Short key resolved"),
            None => debug!(short_key, "Short key not found"),
        }

        Ok(link.map(|l| l.original_url))
    }

    /// Streams every stored key, lazily, in store order.
    pub fn list_keys(&self) -> KeyStream {
        debug!("Fetching all short keys");

        self.store
            .list_keys()
            .inspect(|item| match item {
                Ok(key) => trace!(short_key = %key, "Found key"),
                Err(e) => tracing::error!(error = %e, "Error fetching keys"),
            })
            .boxed()
    }

    /// Builds the public short URL for `short_key`.
    ///
    /// `base_url` is used as a prefix; a `/` is inserted if it does not end with one.
    pub fn short_url(&self, base_url: &str, short_key: &str) -> String {
        if base_url.ends_with('/') {
            format!("{}{}", base_url, short_key)
        } else {
            format!("{}/{}", base_url, short_key)
        }
    }

    /// Number of stored links.
    pub async fn count(&self) -> Result<i64, AppError> {
        Ok(self.store.count().await?)
    }

    /// Returns `true` if the store answers.
    pub async fn store_healthy(&self) -> bool {
        self.store.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::InMemoryUrlStore;
    use crate::utils::key_generator::{MockKeyGenerator, RandomKeyGenerator, is_well_formed_key};
    use futures_util::TryStreamExt;
    use mockall::Sequence;
    use std::collections::HashSet;

    fn service_with(generator: impl KeyGenerator + 'static, max_attempts: usize) -> ShortLinkService {
        ShortLinkService::new(
            Arc::new(InMemoryUrlStore::new()),
            Arc::new(generator),
            max_attempts,
        )
    }

    fn fixed_generator(key: &'static str) -> MockKeyGenerator {
        let mut generator = MockKeyGenerator::new();
        generator
            .expect_generate()
            .returning(move || Ok(key.to_string()));
        generator
    }

    #[tokio::test]
    async fn test_create_and_resolve_round_trip() {
        let service = service_with(RandomKeyGenerator::new(), DEFAULT_MAX_ATTEMPTS);

        let link = service
            .create("https://example.com/a".to_string())
            .await
            .unwrap();

        assert!(is_well_formed_key(&link.short_key));

        let resolved = service.resolve(&link.short_key).await.unwrap();
        assert_eq!(resolved.as_deref(), Some("https://example.com/a"));
    }

    #[tokio::test]
    async fn test_create_stores_url_verbatim() {
        let service = service_with(RandomKeyGenerator::new(), DEFAULT_MAX_ATTEMPTS);

        let link = service.create("HTTPS://Example.COM:443/x?y=1#z".to_string()).await.unwrap();

        let resolved = service.resolve(&link.short_key).await.unwrap();
        assert_eq!(resolved.as_deref(), Some("HTTPS://Example.COM:443/x?y=1#z"));
    }

    #[tokio::test]
    async fn test_create_rejects_control_characters() {
        let mut generator = MockKeyGenerator::new();
        generator.expect_generate().times(0);
        let service = service_with(generator, DEFAULT_MAX_ATTEMPTS);

        for url in ["https://example.com/\nSet-Cookie: a=b", "https://example.com/\r", "\u{7f}"] {
            let result = service.create(url.to_string()).await;
            assert!(matches!(result, Err(AppError::Validation { .. })), "accepted {url:?}");
        }

        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_resolve_unknown_key_is_none() {
        let service = service_with(RandomKeyGenerator::new(), DEFAULT_MAX_ATTEMPTS);

        let resolved = service.resolve("doesNotExist").await.unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_collision_without_retry_is_conflict() {
        let service = service_with(fixed_generator("SameKey1"), 1);

        service.create("https://first.com".to_string()).await.unwrap();
        let result = service.create("https://second.com".to_string()).await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));

        let resolved = service.resolve("SameKey1").await.unwrap();
        assert_eq!(resolved.as_deref(), Some("https://first.com"));
    }

    #[tokio::test]
    async fn test_collision_exhausts_attempts() {
        let mut generator = MockKeyGenerator::new();
        // One call for the first create, three for the failing one.
        generator
            .expect_generate()
            .times(4)
            .returning(|| Ok("SameKey1".to_string()));

        let service = service_with(generator, 3);

        service.create("https://first.com".to_string()).await.unwrap();
        let result = service.create("https://second.com".to_string()).await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_collision_regenerates_key() {
        let mut generator = MockKeyGenerator::new();
        let mut seq = Sequence::new();
        generator
            .expect_generate()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|| Ok("SameKey1".to_string()));
        generator
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok("Fresh_02".to_string()));

        let service = service_with(generator, 3);

        service.create("https://first.com".to_string()).await.unwrap();
        let second = service.create("https://second.com".to_string()).await.unwrap();

        assert_eq!(second.short_key, "Fresh_02");
        assert_eq!(
            service.resolve("SameKey1").await.unwrap().as_deref(),
            Some("https://first.com")
        );
    }

    #[tokio::test]
    async fn test_generator_failure_is_not_retried() {
        let mut generator = MockKeyGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|| Err(AppError::internal("no entropy", json!({}))));

        let service = service_with(generator, 3);
        let result = service.create("https://example.com".to_string()).await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_list_keys_returns_every_created_key() {
        let service = service_with(RandomKeyGenerator::new(), DEFAULT_MAX_ATTEMPTS);

        let mut created = HashSet::new();
        for i in 0..25 {
            let link = service.create(format!("https://example.com/{i}")).await.unwrap();
            created.insert(link.short_key);
        }

        let listed: Vec<String> = service.list_keys().try_collect().await.unwrap();
        let listed_set: HashSet<String> = listed.iter().cloned().collect();

        assert_eq!(listed.len(), 25);
        assert_eq!(listed_set, created);
    }

    #[test]
    fn test_short_url() {
        let service = service_with(RandomKeyGenerator::new(), DEFAULT_MAX_ATTEMPTS);

        assert_eq!(
            service.short_url("http://localhost:8080/api/url/", "AbCd_123"),
            "http://localhost:8080/api/url/AbCd_123"
        );
        assert_eq!(
            service.short_url("https://sho.rt", "AbCd_123"),
            "https://sho.rt/AbCd_123"
        );
    }

    #[test]
    fn test_max_attempts_clamped() {
        let service = service_with(RandomKeyGenerator::new(), 0);
        assert_eq!(service.max_attempts, 1);
    }
}
