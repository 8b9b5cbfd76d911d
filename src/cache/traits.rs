//! Core traits and types for the banner cache.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::banner::{Banner, FeatureId, TagId};

#[derive(Debug, Error)]
pub enum CacheError {
  /// Expected outcome: nothing cached for the key, or the entry aged out
  #[error("banner not cached")]
  Miss,

  #[error("cache database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("failed to encode or decode cached banner: {0}")]
  Serde(#[from] serde_json::Error),

  #[error("cache lock poisoned")]
  Poisoned,

  #[error("cache task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

impl CacheError {
  pub fn is_miss(&self) -> bool {
    matches!(self, CacheError::Miss)
  }
}

/// Deterministic cache key for a tag + feature pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
  pub tag_id: TagId,
  pub feature_id: FeatureId,
}

impl CacheKey {
  pub fn new(tag_id: TagId, feature_id: FeatureId) -> Self {
    Self { tag_id, feature_id }
  }
}

impl fmt::Display for CacheKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "banner:{}:{}", self.tag_id, self.feature_id)
  }
}

/// Best-effort banner accelerator.
///
/// Writes to the store never invalidate entries; they only age out after their TTL.
#[async_trait]
pub trait BannerCache: Send + Sync {
  /// Cached banner for the pair, or [`CacheError::Miss`].
  async fn get(&self, tag_id: TagId, feature_id: FeatureId) -> Result<Banner, CacheError>;

  /// Store `banner` for the pair, replacing any previous entry, expiring after `ttl`.
  async fn set(
    &self,
    tag_id: TagId,
    feature_id: FeatureId,
    banner: &Banner,
    ttl: Duration,
  ) -> Result<(), CacheError>;

  /// Drop entries whose TTL has elapsed. Returns how many were removed.
  async fn purge_expired(&self) -> Result<usize, CacheError> {
    Ok(0)
  }
}

/// Cache that doesn't cache anything.
/// Used when caching is disabled - every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl BannerCache for NoopCache {
  async fn get(&self, _tag_id: TagId, _feature_id: FeatureId) -> Result<Banner, CacheError> {
    Err(CacheError::Miss) // Always miss
  }

  async fn set(
    &self,
    _tag_id: TagId,
    _feature_id: FeatureId,
    _banner: &Banner,
    _ttl: Duration,
  ) -> Result<(), CacheError> {
    Ok(()) // Discard
  }
}

/// Result from a cache-aside read, including where the banner came from.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  pub data: T,
  pub source: CacheSource,
}

impl<T> CacheResult<T> {
  pub fn from_cache(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Cache,
    }
  }

  pub fn from_store(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Store,
    }
  }
}

/// Indicates where a banner came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Cache hit
  Cache,
  /// Cache miss refilled from the store
  Store,
}
