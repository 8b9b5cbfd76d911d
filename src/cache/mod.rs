//! Best-effort banner cache used by the cache-aside read path.
//!
//! This module provides:
//! - A [`BannerCache`] trait keyed by (tag_id, feature_id) that reports a miss
//!   distinctly from a failure
//! - SQLite, in-memory and no-op backends, selected by configuration
//! - [`CacheLayer`], which consults the cache and refills it from a fetcher on miss

mod layer;
mod memory;
mod storage;
mod traits;

pub use layer::CacheLayer;
pub use memory::MemoryCache;
pub use storage::SqliteCache;
pub use traits::{BannerCache, CacheError, CacheKey, CacheResult, CacheSource, NoopCache};
