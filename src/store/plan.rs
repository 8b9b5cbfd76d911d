use std::collections::BTreeSet;

use crate::banner::{diff_tags, Banner, BannerPatch, Content, FeatureId, TagDiff, TagId};

/// One mutation queued by a patch, executed in order inside the patch transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchStatement {
  /// Drop relation rows keyed by the pre-image feature id
  DeleteTags {
    feature_id: FeatureId,
    tag_ids: BTreeSet<TagId>,
  },
  /// Add relation rows keyed by the pre-image feature id, active only if the banner
  /// is active both before and after the patch
  InsertTags {
    feature_id: FeatureId,
    tag_ids: BTreeSet<TagId>,
    is_active: bool,
  },
  /// Move every relation row of the banner to a new feature id
  RewriteFeature { feature_id: FeatureId },
  /// Rewrite the banner row itself and bump `updated_at`
  UpdateBanner {
    feature_id: Option<FeatureId>,
    content: Option<Content>,
    is_active: Option<bool>,
  },
}

impl PatchStatement {
  pub fn name(&self) -> &'static str {
    match self {
      Self::DeleteTags { .. } => "delete_tags",
      Self::InsertTags { .. } => "insert_tags",
      Self::RewriteFeature { .. } => "rewrite_feature",
      Self::UpdateBanner { .. } => "update_banner",
    }
  }
}

/// Ordered change set reconciling a banner's pre-image with its patched post-image.
///
/// Relation statements come before the banner row so that a (feature_id, tag_id)
/// conflict aborts before the banner itself is rewritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchPlan {
  pub diff: TagDiff,
  pub statements: Vec<PatchStatement>,
}

impl PatchPlan {
  pub fn build(pre: &Banner, post: &Banner, patch: &BannerPatch) -> Self {
    let mut plan = Self::default();

    if patch.tag_ids.is_some() {
      plan.diff = diff_tags(&pre.tag_ids, &post.tag_ids);

      if !plan.diff.to_remove.is_empty() {
        plan.statements.push(PatchStatement::DeleteTags {
          feature_id: pre.feature_id,
          tag_ids: plan.diff.to_remove.clone(),
        });
      }
      if !plan.diff.to_add.is_empty() {
        plan.statements.push(PatchStatement::InsertTags {
          feature_id: pre.feature_id,
          tag_ids: plan.diff.to_add.clone(),
          // Activation is left to the banner-row trigger, which checks the final feature id
          is_active: pre.is_active && post.is_active,
        });
      }
    }

    if patch.feature_id.is_some() {
      plan.statements.push(PatchStatement::RewriteFeature {
        feature_id: post.feature_id,
      });
    }

    if !patch.is_empty() {
      plan.statements.push(PatchStatement::UpdateBanner {
        feature_id: patch.feature_id.map(|_| post.feature_id),
        content: patch.content.as_ref().map(|_| post.content.clone()),
        is_active: patch.is_active.map(|_| post.is_active),
      });
    }

    plan
  }
}
