//! SQL used by the SQLite banner store.
//!
//! Tag sets travel as JSON arrays and are expanded with `json_each`.

/// Columns shared by every banner read; tag ids are aggregated from the relation.
macro_rules! banner_select {
  () => {
    "SELECT
        b.id,
        b.feature_id,
        (SELECT json_group_array(br.tag_id) FROM banner_relation AS br WHERE br.banner_id = b.id) AS tag_ids,
        b.content,
        b.is_active,
        b.created_at,
        b.updated_at
    FROM banner AS b"
  };
}

pub const INSERT_BANNER: &str = "
INSERT INTO banner (feature_id, content, is_active, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?4)";

pub const INSERT_TAGS: &str = "
INSERT INTO banner_relation (banner_id, feature_id, tag_id, is_active)
SELECT ?1, ?2, value, ?3 FROM json_each(?4)";

pub const DELETE_TAGS: &str = "
DELETE FROM banner_relation
WHERE banner_id = ?1 AND feature_id = ?2 AND tag_id IN (SELECT value FROM json_each(?3))";

pub const REWRITE_FEATURE: &str = "
UPDATE banner_relation SET feature_id = ?2 WHERE banner_id = ?1";

pub const SELECT_BY_ID: &str = concat!(banner_select!(), "
WHERE b.id = ?1");

/// Prefers the active banner when inactive ones also link the pair.
pub const SELECT_BY_TAG_FEATURE: &str = concat!(banner_select!(), "
JOIN banner_relation AS fb ON fb.banner_id = b.id
WHERE fb.tag_id = ?1 AND fb.feature_id = ?2
ORDER BY fb.is_active DESC, b.created_at DESC, b.id DESC
LIMIT 1");

/// `?1` feature id and `?2` tag id are optional; both must hold on the same relation row.
pub const SELECT_FILTERED: &str = concat!(banner_select!(), "
WHERE (?1 IS NULL AND ?2 IS NULL)
   OR b.id IN (
        SELECT banner_id FROM banner_relation
        WHERE (?1 IS NULL OR feature_id = ?1) AND (?2 IS NULL OR tag_id = ?2)
      )
ORDER BY b.created_at DESC, b.id DESC
LIMIT ?3 OFFSET ?4");

pub const DELETE_BANNER: &str = "
DELETE FROM banner WHERE id = ?1";
