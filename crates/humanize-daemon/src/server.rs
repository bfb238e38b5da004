//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use crate::models::build_registry;
use humanize_pipeline::{Humanizer, ModelRegistry};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Humanize daemon server
pub struct Server {
    config: DaemonConfig,
    models: Arc<ModelRegistry>,
    humanizer: Arc<Humanizer>,
}

impl Server {
    /// Create a new server with the given configuration
    ///
    /// Model backends are wired once here and shared by every request.
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let models = Arc::new(build_registry(&config.models)?);
        let humanizer = Arc::new(Humanizer::new(
            models.clone(),
            config.pipeline.to_pipeline_config(),
        ));

        Ok(Self {
            config,
            models,
            humanizer,
        })
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let state = AppState::new(self.humanizer.clone(), self.models.clone());
        let app = create_router(state, self.config.server.enable_cors);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Humanize daemon listening on {}", addr);
        tracing::info!(models_loaded = self.models.loaded_count(), "Models ready");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Humanize daemon shutting down");
        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
