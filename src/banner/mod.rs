//! Banner domain model: records, sparse patches, list filters and the tag differ.

mod diff;
mod error;
mod patch;
mod types;

pub use diff::{diff_tags, TagDiff};
pub use error::ValidationError;
pub use patch::BannerPatch;
pub use types::{Banner, BannerId, Content, FeatureId, Filter, NewBanner, TagId, User};
