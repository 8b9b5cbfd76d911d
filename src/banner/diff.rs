use std::collections::BTreeSet;

use super::TagId;

/// Tag memberships to drop and to add when moving between two tag sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
  pub to_remove: BTreeSet<TagId>,
  pub to_add: BTreeSet<TagId>,
}

impl TagDiff {
  pub fn is_empty(&self) -> bool {
    self.to_remove.is_empty() && self.to_add.is_empty()
  }
}

/// Compute `current - desired` (to remove) and `desired - current` (to add).
pub fn diff_tags(current: &BTreeSet<TagId>, desired: &BTreeSet<TagId>) -> TagDiff {
  TagDiff {
    to_remove: current.difference(desired).copied().collect(),
    to_add: desired.difference(current).copied().collect(),
  }
}
