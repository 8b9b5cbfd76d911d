//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout stays clean for JSON output. When a log file is
//! configured, a non-blocking appender writes there instead; the returned guard
//! must live until exit or buffered lines are lost.

use color_eyre::{eyre::eyre, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Install the global subscriber. `RUST_LOG` overrides the configured filter.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
  let filter = build_filter(config)?;
  let registry = tracing_subscriber::registry().with(filter);

  match &config.file {
    Some(path) => {
      let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
      let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("Log file path has no file name: {}", path.display()))?;
      std::fs::create_dir_all(dir)?;

      let appender = tracing_appender::rolling::never(dir, file_name);
      let (writer, guard) = tracing_appender::non_blocking(appender);
      registry
        .with(
          tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false),
        )
        .try_init()
        .map_err(|e| eyre!("Failed to install tracing subscriber: {}", e))?;
      Ok(Some(guard))
    }
    None => {
      registry
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| eyre!("Failed to install tracing subscriber: {}", e))?;
      Ok(None)
    }
  }
}

fn build_filter(config: &LogConfig) -> Result<EnvFilter> {
  match EnvFilter::try_from_default_env() {
    Ok(filter) => Ok(filter),
    Err(_) => EnvFilter::try_new(&config.filter)
      .map_err(|e| eyre!("Invalid log filter {:?}: {}", config.filter, e)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_invalid_filter_rejected() {
    if std::env::var_os("RUST_LOG").is_some() {
      return;
    }
    let config = LogConfig {
      filter: "bannerd=notalevel".to_string(),
      file: None,
    };
    assert!(build_filter(&config).is_err());
  }

  #[test]
  fn test_configured_filter_accepted() {
    let config = LogConfig {
      filter: "bannerd=debug,rusqlite=warn".to_string(),
      file: None,
    };
    assert!(build_filter(&config).is_ok());
  }
}
