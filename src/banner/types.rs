use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::error::ValidationError;

pub type BannerId = i64;
pub type TagId = i64;
pub type FeatureId = i64;

/// Arbitrary JSON object carried by a banner.
pub type Content = serde_json::Map<String, serde_json::Value>;

/// A persisted banner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
  #[serde(rename = "banner_id")]
  pub id: BannerId,
  pub tag_ids: BTreeSet<TagId>,
  pub feature_id: FeatureId,
  pub content: Content,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields of a banner that does not exist yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBanner {
  pub tag_ids: BTreeSet<TagId>,
  pub feature_id: FeatureId,
  #[serde(default)]
  pub content: Content,
  #[serde(default)]
  pub is_active: bool,
}

impl NewBanner {
  pub fn validate(&self) -> Result<(), ValidationError> {
    validate_ids(&self.tag_ids, self.feature_id)
  }
}

/// Shared checks for tag ids and feature id of any banner about to be persisted.
pub(crate) fn validate_ids(
  tag_ids: &BTreeSet<TagId>,
  feature_id: FeatureId,
) -> Result<(), ValidationError> {
  if tag_ids.is_empty() {
    return Err(ValidationError::EmptyTagIds);
  }
  if tag_ids.iter().any(|id| *id < 0) {
    return Err(ValidationError::Negative { field: "tag_ids" });
  }
  if feature_id < 0 {
    return Err(ValidationError::Negative {
      field: "feature_id",
    });
  }
  Ok(())
}

/// List filter with pagination by insertion recency (newest first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
  pub feature_id: Option<FeatureId>,
  pub tag_id: Option<TagId>,
  pub limit: u32,
  pub offset: u32,
}

impl Default for Filter {
  fn default() -> Self {
    Self {
      feature_id: None,
      tag_id: None,
      limit: 10,
      offset: 0,
    }
  }
}

impl Filter {
  pub fn new(limit: u32, offset: u32) -> Self {
    Self {
      limit,
      offset,
      ..Self::default()
    }
  }

  pub fn with_feature_id(mut self, feature_id: FeatureId) -> Self {
    self.feature_id = Some(feature_id);
    self
  }

  pub fn with_tag_id(mut self, tag_id: TagId) -> Self {
    self.tag_id = Some(tag_id);
    self
  }
}

/// The caller a lookup is made on behalf of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct User {
  /// Admins may see inactive banners
  pub is_admin: bool,
}

impl User {
  pub fn admin() -> Self {
    Self { is_admin: true }
  }

  pub fn regular() -> Self {
    Self { is_admin: false }
  }
}
