//! SQLite-backed persistent banner cache.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

use super::traits::{BannerCache, CacheError, CacheKey};
use crate::banner::{Banner, FeatureId, TagId};
use crate::db::{schema, Database};

/// Rows removed per purge statement
const PURGE_BATCH_SIZE: i64 = 1000;

/// SQLite-based cache storage implementation.
///
/// Entries carry an absolute expiry in unix milliseconds; a lookup past that deadline
/// is a miss even before [`BannerCache::purge_expired`] removes the row.
#[derive(Clone)]
pub struct SqliteCache {
  conn: Arc<Mutex<Connection>>,
}

impl SqliteCache {
  /// Open or create the cache database at `path`.
  pub fn open(path: &Path) -> color_eyre::Result<Self> {
    let db = Database::open(path, schema::CACHE_SCHEMA)?;
    Ok(Self::from_connection(db.into_connection()))
  }

  pub fn open_in_memory() -> color_eyre::Result<Self> {
    let db = Database::open_in_memory(schema::CACHE_SCHEMA)?;
    Ok(Self::from_connection(db.into_connection()))
  }

  fn from_connection(conn: Connection) -> Self {
    Self {
      conn: Arc::new(Mutex::new(conn)),
    }
  }

  async fn blocking<T, F>(&self, op: F) -> Result<T, CacheError>
  where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, CacheError> + Send + 'static,
  {
    let conn = Arc::clone(&self.conn);
    tokio::task::spawn_blocking(move || {
      let conn = conn.lock().map_err(|_| CacheError::Poisoned)?;
      op(&conn)
    })
    .await?
  }
}

fn now_millis() -> i64 {
  Utc::now().timestamp_millis()
}

#[async_trait]
impl BannerCache for SqliteCache {
  async fn get(&self, tag_id: TagId, feature_id: FeatureId) -> Result<Banner, CacheError> {
    let key = CacheKey::new(tag_id, feature_id).to_string();

    self
      .blocking(move |conn| {
        let data: Option<Vec<u8>> = conn
          .query_row(
            "SELECT data FROM banner_cache WHERE cache_key = ?1 AND expires_at > ?2",
            params![key, now_millis()],
            |row| row.get(0),
          )
          .optional()?;

        match data {
          Some(data) => Ok(serde_json::from_slice(&data)?),
          None => Err(CacheError::Miss),
        }
      })
      .await
  }

  async fn set(
    &self,
    tag_id: TagId,
    feature_id: FeatureId,
    banner: &Banner,
    ttl: Duration,
  ) -> Result<(), CacheError> {
    let key = CacheKey::new(tag_id, feature_id).to_string();
    let data = serde_json::to_vec(banner)?;
    let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);

    self
      .blocking(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO banner_cache (cache_key, data, expires_at)
           VALUES (?1, ?2, ?3)",
          params![key, data, now_millis().saturating_add(ttl_ms)],
        )?;
        Ok(())
      })
      .await
  }

  async fn purge_expired(&self) -> Result<usize, CacheError> {
    let removed = self
      .blocking(|conn| {
        let now = now_millis();
        let mut total = 0;
        loop {
          let removed = conn.execute(
            "DELETE FROM banner_cache WHERE cache_key IN (
               SELECT cache_key FROM banner_cache WHERE expires_at <= ?1 LIMIT ?2
             )",
            params![now, PURGE_BATCH_SIZE],
          )?;
          total += removed;
          if (removed as i64) < PURGE_BATCH_SIZE {
            break;
          }
        }
        Ok(total)
      })
      .await?;

    debug!(removed, "purged expired cache entries");
    Ok(removed)
  }
}
