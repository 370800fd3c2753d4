//! Activity tracker binary - composition root.
//!
//! 1. Parse CLI args and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the shared in-memory activity store
//! 4. Start the axum REST API server (activities + plugin)

mod cli;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tracker_api::{start_server, AppState};
use tracker_core::TrackerConfig;
use tracker_store::{ActivityStore, InMemoryActivityStore};

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing so the file can set the log level; a
    // load error is held and logged once the subscriber is installed.
    let config_path = args.resolve_config_path();
    let (mut config, load_error) = TrackerConfig::load_or_default(&config_path);
    config.server.host = args.resolve_host(&config.server.host);
    config.server.port = args.resolve_port(config.server.port);
    config.general.log_level = args.resolve_log_level(&config.general.log_level);

    // Tracing. RUST_LOG wins over the resolved level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting activity-tracker v{}", env!("CARGO_PKG_VERSION"));
    match load_error {
        Some(e) => tracing::warn!(
            path = %config_path.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
        None => tracing::info!(path = %config_path.display(), "Configuration resolved"),
    }

    // One store instance shared by the REST handlers and the plugin.
    let store: Arc<dyn ActivityStore> = Arc::new(InMemoryActivityStore::new());
    tracing::info!(
        plugin_enabled = config.plugin.enabled,
        requests_per_second = config.server.requests_per_second,
        "In-memory activity store ready"
    );

    let state = AppState::new(config.clone(), store);

    if let Err(e) = start_server(&config, state).await {
        tracing::error!(error = %e, addr = %config.bind_addr(), "API server failed");
        return Err(e.into());
    }

    Ok(())
}
