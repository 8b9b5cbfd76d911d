/// Per-connection settings applied before any schema.
pub const PRAGMAS: &str = r#"
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
"#;

/// Schema for banners and their tag relation.
///
/// `banner_relation.is_active` mirrors the owning banner so that the partial unique
/// index can reject two active banners sharing a (feature_id, tag_id) pair.
pub const STORE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS banner (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    feature_id INTEGER NOT NULL,
    content TEXT NOT NULL,
    is_active INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_banner_created
    ON banner(created_at DESC, id DESC);

CREATE TABLE IF NOT EXISTS banner_relation (
    banner_id INTEGER NOT NULL,
    feature_id INTEGER NOT NULL,
    tag_id INTEGER NOT NULL,
    is_active INTEGER NOT NULL,
    PRIMARY KEY (banner_id, tag_id),
    FOREIGN KEY (banner_id) REFERENCES banner(id) ON DELETE CASCADE
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_banner_relation_active_pair
    ON banner_relation(feature_id, tag_id) WHERE is_active = 1;

CREATE INDEX IF NOT EXISTS idx_banner_relation_pair
    ON banner_relation(feature_id, tag_id);

CREATE TRIGGER IF NOT EXISTS trg_banner_relation_active
AFTER UPDATE OF is_active ON banner
BEGIN
    UPDATE banner_relation SET is_active = NEW.is_active WHERE banner_id = NEW.id;
END;
"#;

/// Schema for the persistent banner cache.
pub const CACHE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS banner_cache (
    cache_key TEXT PRIMARY KEY,
    data BLOB NOT NULL,
    expires_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_banner_cache_expires
    ON banner_cache(expires_at);
"#;
