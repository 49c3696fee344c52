//! Server Implementation
//!
//! HTTP server startup and shutdown.

use crate::audit::AuditAction;
use crate::core::{Config, ServerState};
use crate::routes;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (tests share it)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await,
        };

        let _ = state
            .audit
            .log_sync(
                AuditAction::SystemStartup,
                "system",
                "server:main",
                serde_json::json!({ "environment": self.config.environment }),
            )
            .await;

        let app = routes::build_app(&state).with_state(state.clone());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Attendance admin server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;

        let shutdown_state = state.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
                let _ = shutdown_state
                    .audit
                    .log_sync(
                        AuditAction::SystemShutdown,
                        "system",
                        "server:main",
                        serde_json::json!({}),
                    )
                    .await;
            })
            .await?;

        Ok(())
    }
}
