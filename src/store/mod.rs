//! Durable banner storage.
//!
//! The store owns banner identity, timestamps and the banner↔tag relation. Uniqueness
//! of active (feature_id, tag_id) pairs is enforced by the database itself; the store
//! only translates a constraint violation into [`StoreError::Duplicate`].

mod plan;
mod sqlite;
mod statements;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::banner::{Banner, BannerId, BannerPatch, FeatureId, Filter, NewBanner, TagId, ValidationError};

pub use plan::{PatchPlan, PatchStatement};
pub use sqlite::SqliteBannerStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("banner not found")]
  NotFound,

  #[error("banner with this tag_ids and feature_id already exists")]
  Duplicate,

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("banner {id} changed during patch: {statement} affected no rows")]
  Inconsistent {
    id: BannerId,
    statement: &'static str,
  },

  #[error("operation cancelled")]
  Cancelled,

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("failed to encode or decode banner content: {0}")]
  Serde(#[from] serde_json::Error),

  #[error("malformed timestamp in store: {0:?}")]
  Timestamp(String),

  #[error("store connection lock poisoned")]
  Poisoned,

  #[error("store task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

/// Persistence contract for banners.
///
/// Every method checks `cancel` before doing work; writes also check it between
/// statements and roll back when it fires.
#[async_trait]
pub trait BannerStore: Send + Sync {
  /// Persist a banner and its tag relation as one atomic unit.
  async fn create(&self, cancel: &CancellationToken, banner: NewBanner) -> StoreResult<BannerId>;

  /// Strongly consistent read of the banner linked to a tag + feature pair.
  async fn get_by_tag_feature(
    &self,
    cancel: &CancellationToken,
    tag_id: TagId,
    feature_id: FeatureId,
  ) -> StoreResult<Banner>;

  async fn get_by_id(&self, cancel: &CancellationToken, id: BannerId) -> StoreResult<Banner>;

  /// Banners newest first, restricted by the filter's feature and tag ids when given.
  async fn list_filtered(&self, cancel: &CancellationToken, filter: &Filter)
    -> StoreResult<Vec<Banner>>;

  /// Reconcile a sparse patch against the stored banner in one transaction.
  async fn patch(
    &self,
    cancel: &CancellationToken,
    id: BannerId,
    patch: BannerPatch,
  ) -> StoreResult<()>;

  /// Remove a banner and, by cascade, its relation rows.
  async fn delete(&self, cancel: &CancellationToken, id: BannerId) -> StoreResult<()>;
}

pub(crate) fn ensure_live(cancel: &CancellationToken) -> StoreResult<()> {
  if cancel.is_cancelled() {
    return Err(StoreError::Cancelled);
  }
  Ok(())
}
