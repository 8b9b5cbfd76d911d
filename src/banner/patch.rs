use serde_json::Value;
use std::collections::BTreeSet;

use super::error::ValidationError;
use super::types::{validate_ids, Banner, Content, FeatureId, TagId};

/// Sparse update of a banner.
///
/// `None` means the field was not supplied and must not alter stored state.
/// A field that was supplied with the wrong type (JSON `null` included) is rejected
/// while parsing, so a present field is always typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BannerPatch {
  pub tag_ids: Option<BTreeSet<TagId>>,
  pub feature_id: Option<FeatureId>,
  pub content: Option<Content>,
  pub is_active: Option<bool>,
}

impl BannerPatch {
  /// Parse a patch from a JSON object. Unknown keys are ignored.
  pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
    let object = value.as_object().ok_or(ValidationError::NotAnObject)?;

    let tag_ids = object
      .get("tag_ids")
      .map(|v| {
        v.as_array()
          .and_then(|items| items.iter().map(Value::as_i64).collect::<Option<BTreeSet<_>>>())
          .ok_or(ValidationError::WrongType {
            field: "tag_ids",
            expected: "an array of integers",
          })
      })
      .transpose()?;

    let feature_id = object
      .get("feature_id")
      .map(|v| {
        v.as_i64().ok_or(ValidationError::WrongType {
          field: "feature_id",
          expected: "an integer",
        })
      })
      .transpose()?;

    let content = object
      .get("content")
      .map(|v| {
        v.as_object().cloned().ok_or(ValidationError::WrongType {
          field: "content",
          expected: "an object",
        })
      })
      .transpose()?;

    let is_active = object
      .get("is_active")
      .map(|v| {
        v.as_bool().ok_or(ValidationError::WrongType {
          field: "is_active",
          expected: "a boolean",
        })
      })
      .transpose()?;

    Ok(Self {
      tag_ids,
      feature_id,
      content,
      is_active,
    })
  }

  pub fn is_empty(&self) -> bool {
    self.tag_ids.is_none()
      && self.feature_id.is_none()
      && self.content.is_none()
      && self.is_active.is_none()
  }

  /// Compute the post-image of `banner` with this patch applied.
  pub fn apply(&self, banner: &Banner) -> Result<Banner, ValidationError> {
    let mut updated = banner.clone();

    if let Some(tag_ids) = &self.tag_ids {
      updated.tag_ids = tag_ids.clone();
    }
    if let Some(feature_id) = self.feature_id {
      updated.feature_id = feature_id;
    }
    if let Some(content) = &self.content {
      updated.content = content.clone();
    }
    if let Some(is_active) = self.is_active {
      updated.is_active = is_active;
    }

    validate_ids(&updated.tag_ids, updated.feature_id)?;
    Ok(updated)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;
  use serde_json::json;

  fn banner() -> Banner {
    let now = Utc::now();
    Banner {
      id: 1,
      tag_ids: [1, 2, 3].into_iter().collect(),
      feature_id: 5,
      content: json!({"title": "old"}).as_object().cloned().unwrap(),
      is_active: true,
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn test_absent_fields_are_none() {
    let patch = BannerPatch::from_json(&json!({"is_active": false})).unwrap();
    assert_eq!(patch.is_active, Some(false));
    assert!(patch.tag_ids.is_none());
    assert!(patch.feature_id.is_none());
    assert!(patch.content.is_none());
  }

  #[test]
  fn test_null_is_not_absent() {
    let err = BannerPatch::from_json(&json!({"content": null})).unwrap_err();
    assert_eq!(
      err,
      ValidationError::WrongType {
        field: "content",
        expected: "an object"
      }
    );
  }

  #[test]
  fn test_wrong_type_names_field() {
    let err = BannerPatch::from_json(&json!({"tag_ids": [1, "two"]})).unwrap_err();
    assert!(err.to_string().starts_with("tag_ids"));

    let err = BannerPatch::from_json(&json!({"feature_id": 1.5})).unwrap_err();
    assert!(err.to_string().starts_with("feature_id"));

    let err = BannerPatch::from_json(&json!({"is_active": "yes"})).unwrap_err();
    assert!(err.to_string().starts_with("is_active"));
  }

  #[test]
  fn test_not_an_object() {
    assert_eq!(
      BannerPatch::from_json(&json!([1, 2])),
      Err(ValidationError::NotAnObject)
    );
  }

  #[test]
  fn test_unknown_keys_ignored() {
    let patch = BannerPatch::from_json(&json!({"colour": "red"})).unwrap();
    assert!(patch.is_empty());
  }

  #[test]
  fn test_apply_keeps_untouched_fields() {
    let pre = banner();
    let patch = BannerPatch {
      feature_id: Some(8),
      ..Default::default()
    };
    let post = patch.apply(&pre).unwrap();
    assert_eq!(post.feature_id, 8);
    assert_eq!(post.tag_ids, pre.tag_ids);
    assert_eq!(post.content, pre.content);
    assert_eq!(post.is_active, pre.is_active);
  }

  #[test]
  fn test_apply_rejects_empty_tag_set() {
    let patch = BannerPatch {
      tag_ids: Some(BTreeSet::new()),
      ..Default::default()
    };
    assert_eq!(patch.apply(&banner()), Err(ValidationError::EmptyTagIds));
  }
}
