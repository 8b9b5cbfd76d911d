//! In-process TTL cache.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use super::traits::{BannerCache, CacheError, CacheKey};
use crate::banner::{Banner, FeatureId, TagId};

struct Entry {
  banner: Banner,
  expires_at: Instant,
}

/// Banner cache held in process memory. Expired entries behave as misses and are
/// dropped lazily on lookup or by [`BannerCache::purge_expired`].
#[derive(Default)]
pub struct MemoryCache {
  entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl MemoryCache {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl BannerCache for MemoryCache {
  async fn get(&self, tag_id: TagId, feature_id: FeatureId) -> Result<Banner, CacheError> {
    let key = CacheKey::new(tag_id, feature_id);
    let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;

    let expired = match entries.get(&key) {
      Some(entry) if entry.expires_at > Instant::now() => return Ok(entry.banner.clone()),
      Some(_) => true,
      None => false,
    };
    if expired {
      entries.remove(&key);
    }
    Err(CacheError::Miss)
  }

  async fn set(
    &self,
    tag_id: TagId,
    feature_id: FeatureId,
    banner: &Banner,
    ttl: Duration,
  ) -> Result<(), CacheError> {
    let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
    entries.insert(
      CacheKey::new(tag_id, feature_id),
      Entry {
        banner: banner.clone(),
        expires_at: Instant::now() + ttl,
      },
    );
    Ok(())
  }

  async fn purge_expired(&self) -> Result<usize, CacheError> {
    let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
    let now = Instant::now();
    let before = entries.len();
    entries.retain(|_, entry| entry.expires_at > now);
    Ok(before - entries.len())
  }
}
