//! Short key generation.
//!
//! Keys are the first [`SHORT_KEY_LEN`] characters of a URL-safe, unpadded
//! base64 encoding of 128 random bits. Only the leading 48 bits survive the
//! truncation, so collisions are possible at scale; they are caught by the
//! store's uniqueness constraint, not here.

use crate::error::AppError;
use base64::Engine as _;
use serde_json::json;

/// Length of every generated short key.
pub const SHORT_KEY_LEN: usize = 8;

/// Random bytes drawn per key before encoding.
const RANDOM_BYTES: usize = 16;

/// Source of candidate short keys.
#[cfg_attr(test, mockall::automock)]
pub trait KeyGenerator: Send + Sync {
    /// Produces a candidate key. Uniqueness is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if no randomness is available.
    fn generate(&self) -> Result<String, AppError>;
}

/// OS-randomness backed [`KeyGenerator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomKeyGenerator;

impl RandomKeyGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self) -> Result<String, AppError> {
        let mut buffer = [0u8; RANDOM_BYTES];

        getrandom::fill(&mut buffer).map_err(|e| {
            AppError::internal(
                "Failed to generate short key",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let mut key = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer);
        key.truncate(SHORT_KEY_LEN);

        Ok(key)
    }
}

/// Returns true if `key` has the shape of a generated key.
///
/// Used for diagnostics only; lookups accept any string.
pub fn is_well_formed_key(key: &str) -> bool {
    key.len() == SHORT_KEY_LEN
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
