use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::db::Database;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub database: DatabaseConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
  /// Banner database file (defaults to $XDG_DATA_HOME/bannerd/banners.db)
  pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
  /// Persistent cache in its own SQLite file
  #[default]
  Sqlite,
  /// Process-local cache, gone when the process exits
  Memory,
  /// Caching disabled - every lookup reads the store
  None,
}

impl std::str::FromStr for CacheBackend {
  type Err = color_eyre::Report;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_lowercase().as_str() {
      "sqlite" => Ok(Self::Sqlite),
      "memory" => Ok(Self::Memory),
      "none" | "off" => Ok(Self::None),
      other => Err(eyre!("Unknown cache backend: {}", other)),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  #[serde(default)]
  pub backend: CacheBackend,
  /// Cache database file for the sqlite backend (defaults next to the banner database)
  pub path: Option<PathBuf>,
  /// Lifetime of a cached banner in seconds
  #[serde(default = "default_ttl_secs")]
  pub ttl_secs: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      backend: CacheBackend::default(),
      path: None,
      ttl_secs: default_ttl_secs(),
    }
  }
}

impl CacheConfig {
  pub fn ttl(&self) -> Duration {
    Duration::from_secs(self.ttl_secs)
  }
}

fn default_ttl_secs() -> u64 {
  300
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
  /// `EnvFilter` directive; `RUST_LOG` takes precedence
  #[serde(default = "default_log_filter")]
  pub filter: String,
  /// Write logs to this file instead of stderr
  pub file: Option<PathBuf>,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      filter: default_log_filter(),
      file: None,
    }
  }
}

fn default_log_filter() -> String {
  "info".to_string()
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./bannerd.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/bannerd/config.yaml
  ///
  /// Without a file, defaults are used. Environment overrides apply last.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };

    config.with_env_overrides()
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("bannerd.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("bannerd").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn from_yaml(contents: &str) -> Result<Self> {
    Ok(serde_yaml::from_str(contents)?)
  }

  /// Apply BANNERD_DATABASE_PATH and BANNERD_CACHE_BACKEND.
  fn with_env_overrides(mut self) -> Result<Self> {
    if let Ok(path) = std::env::var("BANNERD_DATABASE_PATH") {
      self.database.path = Some(PathBuf::from(path));
    }
    if let Ok(backend) = std::env::var("BANNERD_CACHE_BACKEND") {
      self.cache.backend = backend.parse()?;
    }
    Ok(self)
  }

  /// Resolved banner database path.
  pub fn database_path(&self) -> Result<PathBuf> {
    match &self.database.path {
      Some(p) => Ok(p.clone()),
      None => Ok(Database::default_dir()?.join("banners.db")),
    }
  }

  /// Resolved cache database path for the sqlite backend.
  pub fn cache_path(&self) -> Result<PathBuf> {
    match &self.cache.path {
      Some(p) => Ok(p.clone()),
      None => {
        let db_path = self.database_path()?;
        Ok(db_path.with_file_name("cache.db"))
      }
    }
  }
}
