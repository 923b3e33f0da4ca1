//! Server execution logic.

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use terakoya_shared::time::get_utc_timestamp;

use crate::domain::Timestamp;

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Collaborative code editor server
///
/// This struct encapsulates the server configuration and provides methods
/// to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// How often the registry is swept for empty rooms past their grace
    /// period.
    pub const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Build the HTTP/WebSocket router.
    ///
    /// Exposed separately so integration tests can serve the exact same
    /// routes on an ephemeral port.
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server until a shutdown signal arrives.
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified
    /// address or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        // Background sweep keeps the registry free of abandoned rooms.
        let registry = self.state.registry.clone();
        let sweeper = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Self::SWEEP_INTERVAL);
            ticker.tick().await; // 最初の tick は即時に完了する
            loop {
                ticker.tick().await;
                let expired = registry.sweep_expired(Timestamp::new(get_utc_timestamp()));
                if !expired.is_empty() {
                    tracing::debug!("Evicted {} empty room(s)", expired.len());
                }
            }
        });

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Collaborative editor server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        sweeper.abort();
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
