//! SQLite implementation of the banner store.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value as SqlValue;
use rusqlite::{
  params, params_from_iter, Connection, OptionalExtension, Row, Transaction, TransactionBehavior,
};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::plan::{PatchPlan, PatchStatement};
use super::statements::*;
use super::{ensure_live, BannerStore, StoreError, StoreResult};
use crate::banner::{Banner, BannerId, BannerPatch, FeatureId, Filter, NewBanner, TagId};
use crate::db::{schema, Database};

/// Banner store backed by a single SQLite connection.
///
/// The connection sits behind a mutex and all SQLite work runs on the blocking pool,
/// so the store can be shared across request tasks.
#[derive(Clone)]
pub struct SqliteBannerStore {
  conn: Arc<Mutex<Connection>>,
}

impl SqliteBannerStore {
  /// Open the store at `path`, creating the schema if needed.
  pub fn open(path: &std::path::Path) -> color_eyre::Result<Self> {
    let db = Database::open(path, schema::STORE_SCHEMA)?;
    Ok(Self::from_connection(db.into_connection()))
  }

  /// Open a private in-memory store.
  pub fn open_in_memory() -> color_eyre::Result<Self> {
    let db = Database::open_in_memory(schema::STORE_SCHEMA)?;
    Ok(Self::from_connection(db.into_connection()))
  }

  /// Wrap a connection that already carries the store schema.
  pub fn from_connection(conn: Connection) -> Self {
    Self {
      conn: Arc::new(Mutex::new(conn)),
    }
  }

  /// Run `op` with exclusive access to the connection on the blocking pool.
  async fn blocking<T, F>(&self, op: F) -> StoreResult<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
  {
    let conn = Arc::clone(&self.conn);
    tokio::task::spawn_blocking(move || {
      let mut conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
      op(&mut conn)
    })
    .await?
  }
}

#[async_trait]
impl BannerStore for SqliteBannerStore {
  async fn create(&self, cancel: &CancellationToken, banner: NewBanner) -> StoreResult<BannerId> {
    banner.validate()?;
    let cancel = cancel.clone();

    let id = self
      .blocking(move |conn| insert_banner(conn, &cancel, &banner))
      .await?;
    info!(banner_id = id, "created banner");
    Ok(id)
  }

  async fn get_by_tag_feature(
    &self,
    cancel: &CancellationToken,
    tag_id: TagId,
    feature_id: FeatureId,
  ) -> StoreResult<Banner> {
    ensure_live(cancel)?;
    self
      .blocking(move |conn| {
        let row = conn
          .query_row(SELECT_BY_TAG_FEATURE, params![tag_id, feature_id], BannerRow::from_row)
          .optional()?;
        row.ok_or(StoreError::NotFound)?.into_banner()
      })
      .await
  }

  async fn get_by_id(&self, cancel: &CancellationToken, id: BannerId) -> StoreResult<Banner> {
    ensure_live(cancel)?;
    self
      .blocking(move |conn| select_banner_by_id(conn, id)?.ok_or(StoreError::NotFound))
      .await
  }

  async fn list_filtered(
    &self,
    cancel: &CancellationToken,
    filter: &Filter,
  ) -> StoreResult<Vec<Banner>> {
    ensure_live(cancel)?;
    let filter = filter.clone();

    self
      .blocking(move |conn| {
        let mut stmt = conn.prepare_cached(SELECT_FILTERED)?;
        let rows = stmt
          .query_map(
            params![
              filter.feature_id,
              filter.tag_id,
              i64::from(filter.limit),
              i64::from(filter.offset)
            ],
            BannerRow::from_row,
          )?
          .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(BannerRow::into_banner).collect()
      })
      .await
  }

  async fn patch(
    &self,
    cancel: &CancellationToken,
    id: BannerId,
    patch: BannerPatch,
  ) -> StoreResult<()> {
    let cancel = cancel.clone();

    let result = self
      .blocking(move |conn| patch_banner(conn, &cancel, id, &patch))
      .await;

    match &result {
      Ok(()) => info!(banner_id = id, "patched banner"),
      Err(e) => warn!(banner_id = id, error = %e, "patch aborted"),
    }
    result
  }

  async fn delete(&self, cancel: &CancellationToken, id: BannerId) -> StoreResult<()> {
    let cancel = cancel.clone();

    self
      .blocking(move |conn| {
        ensure_live(&cancel)?;
        let tx = conn.transaction()?;
        let affected = tx.execute(DELETE_BANNER, params![id])?;
        if affected == 0 {
          return Err(StoreError::NotFound);
        }
        ensure_live(&cancel)?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    info!(banner_id = id, "deleted banner");
    Ok(())
  }
}

fn insert_banner(
  conn: &mut Connection,
  cancel: &CancellationToken,
  banner: &NewBanner,
) -> StoreResult<BannerId> {
  ensure_live(cancel)?;
  let now = format_timestamp(Utc::now());
  let content = serde_json::to_string(&banner.content)?;
  let tag_ids = tag_json(&banner.tag_ids);

  let tx = conn.transaction()?;
  tx.execute(
    INSERT_BANNER,
    params![banner.feature_id, content, banner.is_active, now],
  )
  .map_err(classify)?;
  let id = tx.last_insert_rowid();

  tx.execute(
    INSERT_TAGS,
    params![id, banner.feature_id, banner.is_active, tag_ids],
  )
  .map_err(classify)?;

  ensure_live(cancel)?;
  tx.commit()?;
  Ok(id)
}

fn patch_banner(
  conn: &mut Connection,
  cancel: &CancellationToken,
  id: BannerId,
  patch: &BannerPatch,
) -> StoreResult<()> {
  ensure_live(cancel)?;
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let pre = select_banner_by_id(&tx, id)?.ok_or(StoreError::NotFound)?;
  let post = patch.apply(&pre)?;
  let plan = PatchPlan::build(&pre, &post, patch);
  debug!(
    banner_id = id,
    to_remove = ?plan.diff.to_remove,
    to_add = ?plan.diff.to_add,
    statements = plan.statements.len(),
    "applying patch plan"
  );

  apply_plan(&tx, cancel, id, &plan)?;

  ensure_live(cancel)?;
  tx.commit()?;
  Ok(())
}

/// Execute every statement of `plan`; the caller commits or drops (rolls back) `tx`.
pub(crate) fn apply_plan(
  tx: &Transaction<'_>,
  cancel: &CancellationToken,
  id: BannerId,
  plan: &PatchPlan,
) -> StoreResult<()> {
  let now = format_timestamp(Utc::now());

  for statement in &plan.statements {
    ensure_live(cancel)?;
    let affected = execute_statement(tx, id, statement, &now).map_err(classify)?;
    if affected == 0 {
      return Err(StoreError::Inconsistent {
        id,
        statement: statement.name(),
      });
    }
  }
  Ok(())
}

fn execute_statement(
  tx: &Transaction<'_>,
  id: BannerId,
  statement: &PatchStatement,
  now: &str,
) -> rusqlite::Result<usize> {
  match statement {
    PatchStatement::DeleteTags {
      feature_id,
      tag_ids,
    } => tx.execute(DELETE_TAGS, params![id, feature_id, tag_json(tag_ids)]),
    PatchStatement::InsertTags {
      feature_id,
      tag_ids,
      is_active,
    } => tx.execute(
      INSERT_TAGS,
      params![id, feature_id, is_active, tag_json(tag_ids)],
    ),
    PatchStatement::RewriteFeature { feature_id } => {
      tx.execute(REWRITE_FEATURE, params![id, feature_id])
    }
    PatchStatement::UpdateBanner {
      feature_id,
      content,
      is_active,
    } => {
      let mut values = vec![SqlValue::Integer(id), SqlValue::Text(now.to_string())];
      let mut fields = vec!["updated_at = ?2".to_string()];

      if let Some(feature_id) = feature_id {
        values.push(SqlValue::Integer(*feature_id));
        fields.push(format!("feature_id = ?{}", values.len()));
      }
      if let Some(content) = content {
        let encoded = serde_json::to_string(content)
          .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        values.push(SqlValue::Text(encoded));
        fields.push(format!("content = ?{}", values.len()));
      }
      if let Some(is_active) = is_active {
        values.push(SqlValue::Integer(i64::from(*is_active)));
        fields.push(format!("is_active = ?{}", values.len()));
      }

      tx.execute(
        &format!("UPDATE banner SET {} WHERE id = ?1", fields.join(", ")),
        params_from_iter(values.iter()),
      )
    }
  }
}

fn select_banner_by_id(conn: &Connection, id: BannerId) -> StoreResult<Option<Banner>> {
  conn
    .query_row(SELECT_BY_ID, params![id], BannerRow::from_row)
    .optional()?
    .map(BannerRow::into_banner)
    .transpose()
}

/// Map a unique-constraint violation to [`StoreError::Duplicate`].
fn classify(err: rusqlite::Error) -> StoreError {
  match &err {
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
    {
      StoreError::Duplicate
    }
    _ => StoreError::Database(err),
  }
}

fn tag_json(tag_ids: &BTreeSet<TagId>) -> String {
  let ids: Vec<String> = tag_ids.iter().map(i64::to_string).collect();
  format!("[{}]", ids.join(","))
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn format_timestamp(ts: DateTime<Utc>) -> String {
  ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> StoreResult<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|_| StoreError::Timestamp(s.to_string()))
}

/// Raw banner columns before JSON and timestamp decoding.
struct BannerRow {
  id: BannerId,
  feature_id: FeatureId,
  tag_ids: String,
  content: String,
  is_active: bool,
  created_at: String,
  updated_at: String,
}

impl BannerRow {
  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id: row.get(0)?,
      feature_id: row.get(1)?,
      tag_ids: row.get(2)?,
      content: row.get(3)?,
      is_active: row.get(4)?,
      created_at: row.get(5)?,
      updated_at: row.get(6)?,
    })
  }

  fn into_banner(self) -> StoreResult<Banner> {
    Ok(Banner {
      id: self.id,
      tag_ids: serde_json::from_str(&self.tag_ids)?,
      feature_id: self.feature_id,
      content: serde_json::from_str(&self.content)?,
      is_active: self.is_active,
      created_at: parse_timestamp(&self.created_at)?,
      updated_at: parse_timestamp(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::banner::Content;
  use serde_json::json;

  fn store() -> SqliteBannerStore {
    SqliteBannerStore::open_in_memory().unwrap()
  }

  fn content(title: &str) -> Content {
    json!({"title": title, "text": "some_text", "url": "some_url"})
      .as_object()
      .cloned()
      .unwrap()
  }

  fn new_banner(feature_id: FeatureId, tags: &[TagId], is_active: bool) -> NewBanner {
    NewBanner {
      tag_ids: tags.iter().copied().collect(),
      feature_id,
      content: content("some_title"),
      is_active,
    }
  }

  fn tags(ids: &[TagId]) -> BTreeSet<TagId> {
    ids.iter().copied().collect()
  }

  #[tokio::test]
  async fn test_create_and_get_by_id() {
    let store = store();
    let cancel = CancellationToken::new();

    let id = store
      .create(&cancel, new_banner(1, &[3, 1, 2], true))
      .await
      .unwrap();
    let banner = store.get_by_id(&cancel, id).await.unwrap();

    assert_eq!(banner.id, id);
    assert_eq!(banner.feature_id, 1);
    assert_eq!(banner.tag_ids, tags(&[1, 2, 3]));
    assert_eq!(banner.content, content("some_title"));
    assert!(banner.is_active);
    assert_eq!(banner.created_at, banner.updated_at);
  }

  #[tokio::test]
  async fn test_overlapping_active_create_is_duplicate() {
    let store = store();
    let cancel = CancellationToken::new();

    store
      .create(&cancel, new_banner(1, &[1, 2], true))
      .await
      .unwrap();
    let err = store
      .create(&cancel, new_banner(1, &[2, 3], true))
      .await
      .unwrap_err();
    assert!(matches!(err, StoreError::Duplicate));

    // Nothing from the failed create is visible
    let all = store.list_filtered(&cancel, &Filter::default()).await.unwrap();
    assert_eq!(all.len(), 1);
  }

  #[tokio::test]
  async fn test_inactive_banners_may_share_pairs() {
    let store = store();
    let cancel = CancellationToken::new();

    let active = store
      .create(&cancel, new_banner(1, &[1, 2], true))
      .await
      .unwrap();
    store
      .create(&cancel, new_banner(1, &[2, 3], false))
      .await
      .unwrap();

    let found = store.get_by_tag_feature(&cancel, 2, 1).await.unwrap();
    assert_eq!(found.id, active);
  }

  #[tokio::test]
  async fn test_different_feature_same_tag_is_allowed() {
    let store = store();
    let cancel = CancellationToken::new();

    store
      .create(&cancel, new_banner(1, &[1], true))
      .await
      .unwrap();
    store
      .create(&cancel, new_banner(2, &[1], true))
      .await
      .unwrap();
  }

  #[tokio::test]
  async fn test_create_rejects_empty_tags() {
    let store = store();
    let err = store
      .create(&CancellationToken::new(), new_banner(1, &[], true))
      .await
      .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
  }

  #[tokio::test]
  async fn test_get_by_tag_feature_not_found() {
    let store = store();
    let err = store
      .get_by_tag_feature(&CancellationToken::new(), 5, 9)
      .await
      .unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
  }

  #[tokio::test]
  async fn test_list_filters_and_paginates_newest_first() {
    let store = store();
    let cancel = CancellationToken::new();

    let a = store
      .create(&cancel, new_banner(1, &[1, 2], true))
      .await
      .unwrap();
    let b = store
      .create(&cancel, new_banner(2, &[2, 3], true))
      .await
      .unwrap();
    let c = store
      .create(&cancel, new_banner(1, &[4], true))
      .await
      .unwrap();

    let ids = |banners: Vec<Banner>| banners.into_iter().map(|b| b.id).collect::<Vec<_>>();

    let all = store.list_filtered(&cancel, &Filter::default()).await.unwrap();
    assert_eq!(ids(all), vec![c, b, a]);

    let feature = Filter::default().with_feature_id(1);
    assert_eq!(
      ids(store.list_filtered(&cancel, &feature).await.unwrap()),
      vec![c, a]
    );

    let tag = Filter::default().with_tag_id(2);
    assert_eq!(
      ids(store.list_filtered(&cancel, &tag).await.unwrap()),
      vec![b, a]
    );

    let both = Filter::default().with_feature_id(2).with_tag_id(2);
    assert_eq!(
      ids(store.list_filtered(&cancel, &both).await.unwrap()),
      vec![b]
    );

    let page = Filter::new(1, 1);
    assert_eq!(
      ids(store.list_filtered(&cancel, &page).await.unwrap()),
      vec![b]
    );
  }

  #[tokio::test]
  async fn test_patch_all_fields() {
    let store = store();
    let cancel = CancellationToken::new();

    let id = store
      .create(&cancel, new_banner(1, &[1, 2, 3, 4, 5], true))
      .await
      .unwrap();
    let before = store.get_by_id(&cancel, id).await.unwrap();

    let patch = BannerPatch {
      tag_ids: Some(tags(&[1, 2, 3, 6])),
      feature_id: Some(2),
      content: Some(content("new title")),
      is_active: Some(false),
    };
    store.patch(&cancel, id, patch).await.unwrap();

    let after = store.get_by_id(&cancel, id).await.unwrap();
    assert_eq!(after.feature_id, 2);
    assert_eq!(after.tag_ids, tags(&[1, 2, 3, 6]));
    assert_eq!(after.content, content("new title"));
    assert!(!after.is_active);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);

    // Relation rows moved with the feature
    let moved = store.get_by_tag_feature(&cancel, 6, 2).await.unwrap();
    assert_eq!(moved.id, id);
    assert!(matches!(
      store.get_by_tag_feature(&cancel, 1, 1).await,
      Err(StoreError::NotFound)
    ));
  }

  #[tokio::test]
  async fn test_patch_absent_fields_untouched() {
    let store = store();
    let cancel = CancellationToken::new();

    let id = store
      .create(&cancel, new_banner(1, &[1, 2], true))
      .await
      .unwrap();
    let patch = BannerPatch {
      is_active: Some(false),
      ..Default::default()
    };
    store.patch(&cancel, id, patch).await.unwrap();

    let after = store.get_by_id(&cancel, id).await.unwrap();
    assert!(!after.is_active);
    assert_eq!(after.feature_id, 1);
    assert_eq!(after.tag_ids, tags(&[1, 2]));
    assert_eq!(after.content, content("some_title"));
  }

  #[tokio::test]
  async fn test_patch_missing_banner() {
    let store = store();
    let patch = BannerPatch {
      is_active: Some(true),
      ..Default::default()
    };
    let err = store
      .patch(&CancellationToken::new(), 42, patch)
      .await
      .unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
  }

  #[tokio::test]
  async fn test_patch_tag_conflict_is_duplicate() {
    let store = store();
    let cancel = CancellationToken::new();

    store
      .create(&cancel, new_banner(1, &[1, 2], true))
      .await
      .unwrap();
    let id = store
      .create(&cancel, new_banner(1, &[3], true))
      .await
      .unwrap();

    let patch = BannerPatch {
      tag_ids: Some(tags(&[2, 3])),
      ..Default::default()
    };
    let err = store.patch(&cancel, id, patch).await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate));
    assert_eq!(
      store.get_by_id(&cancel, id).await.unwrap().tag_ids,
      tags(&[3])
    );
  }

  #[tokio::test]
  async fn test_activating_conflicting_banner_is_duplicate() {
    let store = store();
    let cancel = CancellationToken::new();

    store
      .create(&cancel, new_banner(1, &[1, 2], true))
      .await
      .unwrap();
    let id = store
      .create(&cancel, new_banner(1, &[2], false))
      .await
      .unwrap();

    let patch = BannerPatch {
      is_active: Some(true),
      ..Default::default()
    };
    let err = store.patch(&cancel, id, patch).await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate));
    assert!(!store.get_by_id(&cancel, id).await.unwrap().is_active);
  }

  #[tokio::test]
  async fn test_deactivating_patch_may_add_shared_tag() {
    let store = store();
    let cancel = CancellationToken::new();

    let active = store
      .create(&cancel, new_banner(1, &[1, 2], true))
      .await
      .unwrap();
    let id = store
      .create(&cancel, new_banner(1, &[3], true))
      .await
      .unwrap();

    let patch = BannerPatch {
      tag_ids: Some(tags(&[2, 3])),
      is_active: Some(false),
      ..Default::default()
    };
    store.patch(&cancel, id, patch).await.unwrap();

    let after = store.get_by_id(&cancel, id).await.unwrap();
    assert_eq!(after.tag_ids, tags(&[2, 3]));
    assert!(!after.is_active);
    assert_eq!(
      store.get_by_tag_feature(&cancel, 2, 1).await.unwrap().id,
      active
    );

    // Reactivating while the pair is still taken is rejected
    let patch = BannerPatch {
      is_active: Some(true),
      ..Default::default()
    };
    let err = store.patch(&cancel, id, patch).await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate));
  }

  #[tokio::test]
  async fn test_activating_patch_checks_added_tags() {
    let store = store();
    let cancel = CancellationToken::new();

    store
      .create(&cancel, new_banner(1, &[1, 2], true))
      .await
      .unwrap();
    let id = store
      .create(&cancel, new_banner(1, &[3], false))
      .await
      .unwrap();

    let patch = BannerPatch {
      tag_ids: Some(tags(&[2, 3])),
      is_active: Some(true),
      ..Default::default()
    };
    let err = store.patch(&cancel, id, patch).await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate));

    let after = store.get_by_id(&cancel, id).await.unwrap();
    assert_eq!(after.tag_ids, tags(&[3]));
    assert!(!after.is_active);
  }

  #[tokio::test]
  async fn test_failed_feature_rewrite_leaves_banner_untouched() {
    let store = store();
    let cancel = CancellationToken::new();

    store
      .create(&cancel, new_banner(1, &[1, 2], true))
      .await
      .unwrap();
    let id = store
      .create(&cancel, new_banner(2, &[2, 7], true))
      .await
      .unwrap();
    let before = store.get_by_id(&cancel, id).await.unwrap();

    // Tag add succeeds under the old feature, then the rewrite to feature 1 collides on tag 2
    let patch = BannerPatch {
      tag_ids: Some(tags(&[2, 7, 8])),
      feature_id: Some(1),
      content: Some(content("changed")),
      is_active: Some(false),
    };
    let err = store.patch(&cancel, id, patch).await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate));

    let after = store.get_by_id(&cancel, id).await.unwrap();
    assert_eq!(after, before);
  }

  #[tokio::test]
  async fn test_zero_rows_affected_aborts_plan() {
    let store = store();
    let cancel = CancellationToken::new();

    let id = store
      .create(&cancel, new_banner(1, &[1, 2], true))
      .await
      .unwrap();
    let before = store.get_by_id(&cancel, id).await.unwrap();

    let token = cancel.clone();
    let err = store
      .blocking(move |conn| {
        let tx = conn.transaction()?;
        let plan = PatchPlan {
          statements: vec![
            PatchStatement::UpdateBanner {
              feature_id: None,
              content: Some(Content::new()),
              is_active: Some(false),
            },
            // Tag 9 was never linked, so nothing matches
            PatchStatement::DeleteTags {
              feature_id: 1,
              tag_ids: [9].into_iter().collect(),
            },
          ],
          ..Default::default()
        };
        apply_plan(&tx, &token, id, &plan)
      })
      .await
      .unwrap_err();
    assert!(matches!(
      err,
      StoreError::Inconsistent {
        statement: "delete_tags",
        ..
      }
    ));

    assert_eq!(store.get_by_id(&cancel, id).await.unwrap(), before);
  }

  #[tokio::test]
  async fn test_patch_validation_error_leaves_banner_untouched() {
    let store = store();
    let cancel = CancellationToken::new();

    let id = store
      .create(&cancel, new_banner(1, &[1], true))
      .await
      .unwrap();
    let patch = BannerPatch {
      tag_ids: Some(BTreeSet::new()),
      content: Some(content("x")),
      ..Default::default()
    };
    let err = store.patch(&cancel, id, patch).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(
      store.get_by_id(&cancel, id).await.unwrap().content,
      content("some_title")
    );
  }

  #[tokio::test]
  async fn test_cancelled_patch_rolls_back() {
    let store = store();
    let cancel = CancellationToken::new();

    let id = store
      .create(&cancel, new_banner(1, &[1], true))
      .await
      .unwrap();
    cancel.cancel();

    let patch = BannerPatch {
      is_active: Some(false),
      ..Default::default()
    };
    let err = store.patch(&cancel, id, patch).await.unwrap_err();
    assert!(matches!(err, StoreError::Cancelled));

    let fresh = CancellationToken::new();
    assert!(store.get_by_id(&fresh, id).await.unwrap().is_active);
  }

  #[tokio::test]
  async fn test_delete_then_get_is_not_found() {
    let store = store();
    let cancel = CancellationToken::new();

    let id = store
      .create(&cancel, new_banner(1, &[1, 2], true))
      .await
      .unwrap();
    store.delete(&cancel, id).await.unwrap();

    assert!(matches!(
      store.get_by_id(&cancel, id).await,
      Err(StoreError::NotFound)
    ));
    assert!(matches!(
      store.get_by_tag_feature(&cancel, 1, 1).await,
      Err(StoreError::NotFound)
    ));
    assert!(matches!(
      store.delete(&cancel, id).await,
      Err(StoreError::NotFound)
    ));

    // Cascade freed the pair for a new active banner
    store
      .create(&cancel, new_banner(1, &[1], true))
      .await
      .unwrap();
  }
}
