use thiserror::Error;

/// A caller-supplied banner or patch field has the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("{field} must be {expected}")]
  WrongType {
    field: &'static str,
    expected: &'static str,
  },

  #[error("{field} must be a non-negative integer")]
  Negative { field: &'static str },

  #[error("tag_ids must not be empty")]
  EmptyTagIds,

  #[error("patch must be a JSON object")]
  NotAnObject,
}
