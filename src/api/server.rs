//! API server setup.
//!
//! # Responsibilities
//! - Bind the listener (plain or TLS)
//! - Serve the router with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;

use crate::api::{build_router, ApiState};
use crate::settings::Settings;
use crate::store::ConfigStore;

/// HTTP server exposing the configuration store.
pub struct ApiServer {
    state: ApiState,
}

impl ApiServer {
    pub fn new(store: Arc<ConfigStore>, settings: Arc<Settings>) -> Self {
        Self {
            state: ApiState { store, settings },
        }
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(self, addr: SocketAddr) -> Result<(), std::io::Error> {
        let tls = self.state.settings.api.tls.clone();
        let app = build_router(self.state);

        match tls {
            Some(tls) => {
                let rustls = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;
                tracing::info!(address = %addr, "API server starting (TLS)");
                axum_server::bind_rustls(addr, rustls)
                    .serve(app.into_make_service())
                    .await?;
            }
            None => {
                let listener = TcpListener::bind(addr).await?;
                tracing::info!(address = %addr, "API server starting");
                axum::serve(listener, app)
                    .with_graceful_shutdown(shutdown_signal())
                    .await?;
            }
        }

        tracing::info!("API server stopped");
        Ok(())
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
