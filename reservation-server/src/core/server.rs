//! Server Implementation
//!
//! HTTP 服务器启动和优雅关闭

use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::api;
use crate::core::{Config, Result, ServerError, ServerState};

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

    /// Create server with existing state (for sharing with oneshot)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(
            "🍽️  Reservation server listening on {} (storage: {})",
            addr,
            state.store.backend()
        );

        let app = api::build_app(state);
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let serve = axum::serve(listener, app).with_graceful_shutdown(async {
            let _ = stop_rx.await;
        });
        let mut server = tokio::spawn(async move { serve.await });

        tokio::select! {
            joined = &mut server => return flatten(joined),
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down...");
            }
        }

        let _ = stop_tx.send(());

        // 在途请求的排空时间有上限
        let drain = Duration::from_millis(self.config.shutdown_timeout_ms);
        match tokio::time::timeout(drain, &mut server).await {
            Ok(joined) => flatten(joined)?,
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.config.shutdown_timeout_ms,
                    "In-flight requests did not finish in time, aborting"
                );
                server.abort();
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}

fn flatten(
    joined: std::result::Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<()> {
    match joined {
        Ok(result) => Ok(result?),
        Err(e) => Err(ServerError::Io(std::io::Error::other(e))),
    }
}
