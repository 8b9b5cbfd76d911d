//! Banner resolution service.
//!
//! Reads go through the cache unless the caller asks for the last revision; writes go
//! straight to the store. Writes never invalidate cached banners, so a cached lookup
//! may lag a write by up to the cache TTL.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::banner::{Banner, BannerId, BannerPatch, Content, FeatureId, Filter, NewBanner, TagId, User};
use crate::cache::{BannerCache, CacheLayer};
use crate::error::{ServiceError, ServiceResult};
use crate::store::BannerStore;

#[derive(Clone)]
pub struct BannerService {
  store: Arc<dyn BannerStore>,
  cache: CacheLayer,
}

impl BannerService {
  pub fn new(store: Arc<dyn BannerStore>, cache: Arc<dyn BannerCache>, ttl: Duration) -> Self {
    Self {
      store,
      cache: CacheLayer::new(cache).with_ttl(ttl),
    }
  }

  /// Content of the banner linked to a tag + feature pair.
  ///
  /// Inactive banners are reported as not found to non-admin users, so their
  /// existence does not leak.
  pub async fn get_user_banner(
    &self,
    cancel: &CancellationToken,
    user: User,
    tag_id: TagId,
    feature_id: FeatureId,
    use_last_revision: bool,
  ) -> ServiceResult<Content> {
    cancellable(cancel, async {
      let banner = if use_last_revision {
        self.store.get_by_tag_feature(cancel, tag_id, feature_id).await?
      } else {
        let result = self
          .cache
          .fetch_one(tag_id, feature_id, || async move {
            self
              .store
              .get_by_tag_feature(cancel, tag_id, feature_id)
              .await
              .map_err(ServiceError::from)
          })
          .await?;
        debug!(tag_id, feature_id, source = ?result.source, "resolved banner");
        result.data
      };

      if !banner.is_active && !user.is_admin {
        return Err(ServiceError::NotFound);
      }
      Ok(banner.content)
    })
    .await
  }

  /// Filtered banner list. Never cached.
  pub async fn list_banners(
    &self,
    cancel: &CancellationToken,
    filter: &Filter,
  ) -> ServiceResult<Vec<Banner>> {
    cancellable(cancel, async {
      self
        .store
        .list_filtered(cancel, filter)
        .await
        .map_err(ServiceError::from)
    })
    .await
  }

  pub async fn create_banner(
    &self,
    cancel: &CancellationToken,
    banner: NewBanner,
  ) -> ServiceResult<BannerId> {
    Ok(self.store.create(cancel, banner).await?)
  }

  pub async fn patch_banner(
    &self,
    cancel: &CancellationToken,
    id: BannerId,
    patch: BannerPatch,
  ) -> ServiceResult<()> {
    Ok(self.store.patch(cancel, id, patch).await?)
  }

  pub async fn delete_banner(&self, cancel: &CancellationToken, id: BannerId) -> ServiceResult<()> {
    Ok(self.store.delete(cancel, id).await?)
  }

  /// Drop expired entries from the wired cache.
  pub async fn purge_cache(&self) -> ServiceResult<usize> {
    Ok(self.cache.cache().purge_expired().await?)
  }
}

/// Race a read against the caller's cancellation signal.
///
/// Writes are not raced: the store checks the token itself and rolls back, so a
/// write that reached commit is always reported as done.
async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> ServiceResult<T>
where
  F: Future<Output = ServiceResult<T>>,
{
  tokio::select! {
    biased;
    _ = cancel.cancelled() => Err(ServiceError::Cancelled),
    result = fut => result,
  }
}
