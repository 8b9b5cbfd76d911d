use thiserror::Error;

use crate::banner::ValidationError;
use crate::cache::CacheError;
use crate::store::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced at the banner service boundary.
///
/// `NotFound`, `AlreadyExists` and `Validation` are client-facing; `Store` and `Cache`
/// wrap backing failures that callers report as internal errors.
#[derive(Debug, Error)]
pub enum ServiceError {
  #[error("banner not found")]
  NotFound,

  #[error("banner with this tag_ids and feature_id already exists")]
  AlreadyExists,

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("request cancelled")]
  Cancelled,

  #[error("store failure")]
  Store(#[source] StoreError),

  #[error("cache failure")]
  Cache(#[source] CacheError),
}

impl From<StoreError> for ServiceError {
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::NotFound => ServiceError::NotFound,
      StoreError::Duplicate => ServiceError::AlreadyExists,
      StoreError::Validation(e) => ServiceError::Validation(e),
      StoreError::Cancelled => ServiceError::Cancelled,
      other => ServiceError::Store(other),
    }
  }
}

impl From<CacheError> for ServiceError {
  fn from(err: CacheError) -> Self {
    ServiceError::Cache(err)
  }
}

impl ServiceError {
  /// Whether the error is caused by the request rather than by a backing failure.
  pub fn is_client_error(&self) -> bool {
    matches!(
      self,
      ServiceError::NotFound | ServiceError::AlreadyExists | ServiceError::Validation(_)
    )
  }
}
