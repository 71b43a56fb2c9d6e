//! Caller-owned memoization of the last scored station set.
//!
//! Scoring is cheap, but the map redraws on every pan and the renderer asks
//! for the same layer on every frame. A [`ScoreCache`] lets each caller keep
//! its own last result, keyed by a digest of the raw collection bytes and
//! the config, and drop it whenever it knows the source changed.

use std::sync::Arc;

use chargepilot_ingest::{IngestError, parse_feature_collection};
use chargepilot_scoring_models::ScoringConfig;
use chargepilot_station_models::StationRecord;
use sha2::{Digest, Sha256};

use crate::pipeline::score_collection;

/// Errors from [`ScoreCache::get_or_compute`].
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The collection bytes are not UTF-8.
    #[error("Collection is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The collection could not be parsed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// The config could not be fingerprinted.
    #[error("Config fingerprint failed: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

/// Computes the cache key for a collection under a config.
///
/// # Errors
///
/// Returns an error if the config cannot be serialized.
pub fn cache_key(collection_bytes: &[u8], config: &ScoringConfig) -> Result<String, CacheError> {
    let mut hasher = Sha256::new();
    hasher.update(collection_bytes);
    hasher.update([0_u8]);
    hasher.update(serde_json::to_vec(config)?);
    Ok(hex::encode(hasher.finalize()))
}

/// Holds the most recently scored station set.
#[derive(Debug, Default)]
pub struct ScoreCache {
    entry: Option<(String, Arc<[StationRecord]>)>,
}

impl ScoreCache {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self { entry: None }
    }

    /// Returns the cached records for these bytes and config, scoring them
    /// first if the key differs from the last call.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a UTF-8 feature collection.
    /// A failed call leaves the previous entry in place.
    pub fn get_or_compute(
        &mut self,
        collection_bytes: &[u8],
        config: &ScoringConfig,
    ) -> Result<Arc<[StationRecord]>, CacheError> {
        let key = cache_key(collection_bytes, config)?;

        if let Some((cached_key, records)) = &self.entry
            && *cached_key == key
        {
            log::trace!("Score cache hit {}", &key[..12]);
            return Ok(Arc::clone(records));
        }

        log::debug!("Score cache miss {}", &key[..12]);
        let collection = parse_feature_collection(std::str::from_utf8(collection_bytes)?)?;
        let records: Arc<[StationRecord]> = score_collection(&collection, config).into();
        self.entry = Some((key, Arc::clone(&records)));
        Ok(records)
    }

    /// Key of the cached entry, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.entry.as_ref().map(|(key, _)| key.as_str())
    }

    /// Drops the cached entry.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            log::debug!("Score cache invalidated");
        }
    }
}
