//! API server process

use super::ApiService;
use crate::common::{Config, Result};
use std::net::SocketAddr;

pub struct ApiServer {
    config: Config,
    api: ApiService,
}

impl ApiServer {
    pub fn new(config: Config, api: ApiService) -> Self {
        let api = api.with_env(&config.env);
        Self { config, api }
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn serve(self) -> Result<()> {
        let address = self.config.address();
        let listener = tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port))
            .await?;

        tracing::info!("Listening on {}", address);
        tracing::info!("  Environment: {}", self.api.env());

        let router = self.api.router();
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
