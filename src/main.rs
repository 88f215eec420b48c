use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use album_mirror::config::{AppConfig, CliConfig, FileConfig};
use album_mirror::mirror_store::{MirrorStore, SqliteMirrorStore};
use album_mirror::remote::{JsonApiClient, ResourceKind, DEFAULT_REMOTE_BASE_URL};
use album_mirror::sync::{MapperSettings, SyncCoordinator};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

fn parse_kind(s: &str) -> Result<ResourceKind, String> {
    s.parse()
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite mirror database file (created if absent).
    #[clap(value_parser = parse_path)]
    pub mirror_db: Option<PathBuf>,

    /// Base URL of the remote resource API.
    #[clap(long, default_value = DEFAULT_REMOTE_BASE_URL)]
    pub remote_base_url: String,

    /// Timeout in seconds for remote requests.
    #[clap(long, default_value_t = 30)]
    pub request_timeout_sec: u64,

    /// Accept user records that lack a company object.
    #[clap(long)]
    pub allow_missing_company: bool,

    /// Sync only the given kind (repeatable, processed in the order given).
    /// Defaults to a full sync: users, albums, photos.
    #[clap(long = "only", value_name = "KIND", value_parser = parse_kind)]
    pub only: Vec<ResourceKind>,

    /// Path to a TOML config file; its values override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    info!(
        "album-mirror {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        mirror_db: cli_args.mirror_db.clone(),
        remote_base_url: cli_args.remote_base_url.clone(),
        request_timeout_sec: cli_args.request_timeout_sec,
        require_company: !cli_args.allow_missing_company,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Opening mirror database at {:?}...", config.mirror_db);
    let store = Arc::new(SqliteMirrorStore::new(&config.mirror_db)?);

    info!("Syncing from {}", config.remote_base_url);
    let fetcher = Arc::new(JsonApiClient::new(
        config.remote_base_url.clone(),
        config.request_timeout_sec,
    ));

    let coordinator =
        SyncCoordinator::new(fetcher, store.clone()).with_mapper_settings(MapperSettings {
            require_company: config.require_company,
        });

    let outcomes = if cli_args.only.is_empty() {
        coordinator.sync_all().await
    } else {
        let mut outcomes = Vec::with_capacity(cli_args.only.len());
        for kind in &cli_args.only {
            outcomes.push(coordinator.sync_kind(*kind).await);
        }
        outcomes
    };

    let counts = store.counts()?;
    info!(
        "Mirror now holds {} users, {} albums, {} photos",
        counts.users, counts.albums, counts.photos
    );

    let failed: Vec<_> = outcomes
        .iter()
        .filter(|o| !o.succeeded())
        .map(|o| o.kind.to_string())
        .collect();
    if !failed.is_empty() {
        bail!("sync failed for: {}", failed.join(", "));
    }

    Ok(())
}
