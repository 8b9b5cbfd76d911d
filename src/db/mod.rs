pub mod schema;

use color_eyre::{eyre::eyre, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// SQLite connection wrapper that applies a schema on open
pub struct Database {
  conn: Connection,
}

impl Database {
  /// Open or create the database at `path` and apply `schema`
  pub fn open(path: &Path, schema: &str) -> Result<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create database directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open database at {}: {}", path.display(), e))?;

    Self::init(conn, schema)
  }

  /// Open a private in-memory database and apply `schema`
  pub fn open_in_memory(schema: &str) -> Result<Self> {
    let conn =
      Connection::open_in_memory().map_err(|e| eyre!("Failed to open in-memory database: {}", e))?;
    Self::init(conn, schema)
  }

  fn init(conn: Connection, schema: &str) -> Result<Self> {
    conn
      .execute_batch(schema::PRAGMAS)
      .map_err(|e| eyre!("Failed to configure connection: {}", e))?;
    let db = Self { conn };
    db.run_migrations(schema)?;
    Ok(db)
  }

  /// Default directory for bannerd data files
  pub fn default_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("bannerd"))
  }

  /// Run database migrations
  fn run_migrations(&self, schema: &str) -> Result<()> {
    self
      .conn
      .execute_batch(schema)
      .map_err(|e| eyre!("Failed to run migrations: {}", e))?;
    Ok(())
  }

  /// Give up the wrapper and hand out the configured connection
  pub fn into_connection(self) -> Connection {
    self.conn
  }
}
