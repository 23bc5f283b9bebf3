//! proxy-configd (v1)
//!
//! A configuration daemon for the reverse proxy, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                 PROXY-CONFIGD                    │
//!                      │                                                  │
//!     API Request      │  ┌─────────┐    ┌──────────┐    ┌────────────┐  │
//!     ─────────────────┼─▶│  api    │───▶│  store   │───▶│ repository │  │
//!                      │  │ router  │    │  facade  │    │ (per kind) │  │
//!                      │  └─────────┘    └────┬─────┘    └────────────┘  │
//!                      │                      │ flush                    │
//!                      │                      ▼                          │
//!     proxy.toml       │               ┌─────────────┐     ┌──────────┐  │
//!     ◀────────────────┼───────────────│ persistence │◀────│ watcher  │◀─┼──── external
//!                      │               │ (atomic)    │     │ (reload) │  │     edits
//!                      │               └─────────────┘     └──────────┘  │
//!                      │                                                  │
//!                      │  ┌────────────────────────────────────────────┐ │
//!                      │  │  settings · validation · observability     │ │
//!                      │  └────────────────────────────────────────────┘ │
//!                      └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use proxy_configd::api::server::ApiServer;
use proxy_configd::observability::{logging, metrics};
use proxy_configd::persistence::TomlFilePersistence;
use proxy_configd::settings::{load_settings, Settings};
use proxy_configd::store::ConfigStore;
use proxy_configd::watcher::ConfigWatcher;

#[derive(Parser)]
#[command(name = "proxy-configd")]
#[command(about = "Versioned configuration daemon for the reverse proxy", long_about = None)]
struct Args {
    /// Path to the daemon settings file (defaults apply when omitted).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };

    logging::init_logging(&settings.observability.log_level);
    tracing::info!("proxy-configd v{} starting", env!("CARGO_PKG_VERSION"));

    if settings.observability.metrics_enabled {
        if let Ok(addr) = settings.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %settings.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let persistence = Arc::new(TomlFilePersistence::new(&settings.storage.config_file));
    let store = Arc::new(ConfigStore::open(persistence)?);
    tracing::info!(
        config_file = ?settings.storage.config_file,
        version = store.version(),
        "Configuration store ready"
    );

    // The watcher handle must stay alive for the lifetime of the process.
    let _watcher = if settings.storage.watch {
        match ConfigWatcher::new(&settings.storage.config_file, store.clone()).run() {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::error!(error = %e, "Failed to start config watcher");
                None
            }
        }
    } else {
        None
    };

    let addr = settings.api.bind_address.parse()?;
    ApiServer::new(store, Arc::new(settings)).run(addr).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
