use bannerd::banner::{BannerId, BannerPatch, FeatureId, Filter, NewBanner, TagId, User};
use bannerd::cache::{BannerCache, MemoryCache, NoopCache, SqliteCache};
use bannerd::config::{CacheBackend, Config};
use bannerd::store::SqliteBannerStore;
use bannerd::{logging, BannerService, ServiceError};
use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "bannerd")]
#[command(about = "Banner storage with cached tag + feature lookup")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/bannerd/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create a banner and print its id
  Create {
    /// Tag ids, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    tag_ids: Vec<TagId>,
    #[arg(long)]
    feature_id: FeatureId,
    /// Banner content as a JSON object
    #[arg(long, default_value = "{}")]
    content: String,
    #[arg(long)]
    active: bool,
  },
  /// Print the content of the banner for a tag + feature pair
  Get {
    #[arg(long)]
    tag_id: TagId,
    #[arg(long)]
    feature_id: FeatureId,
    /// Skip the cache and read the store directly
    #[arg(long)]
    last_revision: bool,
    /// Resolve as an admin, which also sees inactive banners
    #[arg(long)]
    admin: bool,
  },
  /// List banners, newest first
  List {
    #[arg(long)]
    feature_id: Option<FeatureId>,
    #[arg(long)]
    tag_id: Option<TagId>,
    #[arg(long, default_value_t = 10)]
    limit: u32,
    #[arg(long, default_value_t = 0)]
    offset: u32,
  },
  /// Apply a JSON patch document to a banner
  Patch { id: BannerId, patch: String },
  /// Delete a banner
  Delete { id: BannerId },
  /// Remove expired entries from the cache
  PurgeCache,
}

#[derive(Serialize)]
struct Created {
  banner_id: BannerId,
}

#[derive(Serialize)]
struct Purged {
  removed: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = Config::load(args.config.as_deref())?;
  let log_guard = logging::init(&config.log)?;

  let service = build_service(&config)?;

  // Ctrl-C cancels whatever operation is in flight
  let cancel = CancellationToken::new();
  {
    let cancel = cancel.clone();
    tokio::spawn(async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        warn!("interrupted, cancelling");
        cancel.cancel();
      }
    });
  }

  match run(&service, &cancel, args.command).await {
    // Request problems get a short message and exit status 2
    Err(err) => match err.downcast_ref::<ServiceError>() {
      Some(e) if e.is_client_error() => {
        eprintln!("error: {}", e);
        drop(log_guard);
        std::process::exit(2);
      }
      _ => Err(err),
    },
    Ok(()) => Ok(()),
  }
}

fn build_service(config: &Config) -> Result<BannerService> {
  let db_path = config.database_path()?;
  let store = SqliteBannerStore::open(&db_path)?;

  let cache: Arc<dyn BannerCache> = match config.cache.backend {
    CacheBackend::Sqlite => Arc::new(SqliteCache::open(&config.cache_path()?)?),
    CacheBackend::Memory => Arc::new(MemoryCache::new()),
    CacheBackend::None => Arc::new(NoopCache),
  };

  info!(
    database = %db_path.display(),
    cache = ?config.cache.backend,
    ttl_secs = config.cache.ttl_secs,
    "opened banner store"
  );

  Ok(BannerService::new(
    Arc::new(store),
    cache,
    config.cache.ttl(),
  ))
}

async fn run(service: &BannerService, cancel: &CancellationToken, command: Command) -> Result<()> {
  match command {
    Command::Create {
      tag_ids,
      feature_id,
      content,
      active,
    } => {
      let content = serde_json::from_str(&content)
        .map_err(|e| eyre!("Content must be a JSON object: {}", e))?;
      let banner = NewBanner {
        tag_ids: tag_ids.into_iter().collect(),
        feature_id,
        content,
        is_active: active,
      };
      let banner_id = service.create_banner(cancel, banner).await?;
      print_json(&Created { banner_id })
    }
    Command::Get {
      tag_id,
      feature_id,
      last_revision,
      admin,
    } => {
      let user = if admin { User::admin() } else { User::regular() };
      let content = service
        .get_user_banner(cancel, user, tag_id, feature_id, last_revision)
        .await?;
      print_json(&content)
    }
    Command::List {
      feature_id,
      tag_id,
      limit,
      offset,
    } => {
      let mut filter = Filter::new(limit, offset);
      if let Some(feature_id) = feature_id {
        filter = filter.with_feature_id(feature_id);
      }
      if let Some(tag_id) = tag_id {
        filter = filter.with_tag_id(tag_id);
      }
      let banners = service.list_banners(cancel, &filter).await?;
      print_json(&banners)
    }
    Command::Patch { id, patch } => {
      let value: serde_json::Value =
        serde_json::from_str(&patch).map_err(|e| eyre!("Patch is not valid JSON: {}", e))?;
      let patch = BannerPatch::from_json(&value).map_err(ServiceError::from)?;
      service.patch_banner(cancel, id, patch).await?;
      Ok(())
    }
    Command::Delete { id } => {
      service.delete_banner(cancel, id).await?;
      Ok(())
    }
    Command::PurgeCache => {
      let removed = service.purge_cache().await?;
      print_json(&Purged { removed })
    }
  }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
