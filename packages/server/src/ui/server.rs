//! Router assembly and server execution.

use std::{path::PathBuf, sync::Arc};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use super::{
    handler::{
        change_push_subscription, get_status, health_check, list_messages, login,
        register_push_subscription, reset_messages, subscribe, toggle_mode, upload_files,
        websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Request body cap for `/upload`.
const UPLOAD_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// Hatoba relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state, PathBuf::from("uploads"));
/// server.run("127.0.0.1".to_string(), 3000).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// Directory served under `/files`
    upload_dir: PathBuf,
}

impl Server {
    pub fn new(state: Arc<AppState>, upload_dir: PathBuf) -> Self {
        Self { state, upload_dir }
    }

    /// Build the router with every endpoint and middleware layer.
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // 管理 API
            .route("/messages", post(list_messages))
            .route("/reset", post(reset_messages))
            .route("/toggle", get(toggle_mode))
            // 公開 API
            .route("/login", post(login))
            .route(
                "/upload",
                post(upload_files).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
            )
            .route("/subscribe", get(subscribe))
            .route("/status", get(get_status))
            .route("/notifications/subscribe", post(register_push_subscription))
            .route("/notifications/change", post(change_push_subscription))
            .route("/api/health", get(health_check))
            .nest_service("/files", ServeDir::new(&self.upload_dir))
            .with_state(self.state.clone())
            .layer(CatchPanicLayer::new())
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// Bind to `host:port` and serve until a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Hatoba relay listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
