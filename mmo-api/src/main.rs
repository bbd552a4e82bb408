//! mmo-api - media marker organizer service
//!
//! Startup order: CLI arguments, TOML config (plus environment overrides),
//! tracing, root folder resolution, key-value store, then the HTTP server.

use anyhow::{Context, Result};
use clap::Parser;
use mmo_common::config::{ensure_root_folder, RootFolderResolver, TomlConfig};
use mmo_common::storage::FileStore;
use mmo_api::{build_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "mmo-api")]
#[command(about = "Media marker organizer service")]
#[command(version)]
struct Args {
    /// Root folder holding the key-value store (overrides MMO_ROOT_FOLDER and config)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// TOML config file (default: <config dir>/mmo/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "MMO_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides config)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    config.apply_env_overrides();
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    let level = config.logging.level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("mmo_api={level},mmo_common={level},tower_http=debug").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting mmo-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = RootFolderResolver::new()
        .with_cli_arg(args.root_folder)
        .with_toml(&config)
        .resolve();
    ensure_root_folder(&root_folder)
        .with_context(|| format!("Failed to create root folder {}", root_folder.display()))?;
    info!("Root folder: {}", root_folder.display());

    let store = FileStore::in_root(&root_folder).context("Failed to open key-value store")?;
    info!("Key-value store: {}", store.path().display());

    let state = AppState::new(&config, Arc::new(store))?;
    info!(
        spotify = state.spotify.is_configured(),
        youtube = state.youtube.is_configured(),
        youtube_api_key = state.youtube_api_key.is_some(),
        production = config.production,
        "Provider configuration"
    );
    let app = build_router(state);

    let addr = format!("{}:{}", config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("mmo-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
