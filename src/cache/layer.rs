//! Cache layer that orchestrates cache-aside reads over any banner cache.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::traits::{BannerCache, CacheError, CacheResult};
use crate::banner::{Banner, FeatureId, TagId};

/// Default lifetime of a cached banner
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Cache layer that manages cache lookups and refills from a backing fetcher.
///
/// The wrapped cache may be any [`BannerCache`], including the no-op one.
pub struct CacheLayer {
  cache: Arc<dyn BannerCache>,
  /// How long a refilled entry lives
  ttl: Duration,
}

impl CacheLayer {
  pub fn new(cache: Arc<dyn BannerCache>) -> Self {
    Self {
      cache,
      ttl: DEFAULT_TTL,
    }
  }

  /// Set the TTL applied to every refilled entry.
  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  pub fn cache(&self) -> &Arc<dyn BannerCache> {
    &self.cache
  }

  /// Fetch a banner with cache-first strategy.
  ///
  /// 1. Check cache - on hit, return immediately
  /// 2. On miss, call `fetcher`
  /// 3. Store the fetched banner before returning it
  ///
  /// Cache failures other than a miss, including a failed refill, are returned as errors.
  pub async fn fetch_one<F, Fut, E>(
    &self,
    tag_id: TagId,
    feature_id: FeatureId,
    fetcher: F,
  ) -> Result<CacheResult<Banner>, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Banner, E>>,
    E: From<CacheError>,
  {
    match self.cache.get(tag_id, feature_id).await {
      Ok(banner) => {
        debug!(tag_id, feature_id, "banner cache hit");
        return Ok(CacheResult::from_cache(banner));
      }
      Err(CacheError::Miss) => debug!(tag_id, feature_id, "banner cache miss"),
      Err(e) => return Err(e.into()),
    }

    let banner = fetcher().await?;
    self
      .cache
      .set(tag_id, feature_id, &banner, self.ttl)
      .await?;
    Ok(CacheResult::from_store(banner))
  }
}

impl Clone for CacheLayer {
  fn clone(&self) -> Self {
    Self {
      cache: Arc::clone(&self.cache),
      ttl: self.ttl,
    }
  }
}
