//! HTTP and WebSocket surface
//!
//! - `GET /`        dashboard page
//! - `GET /data`    current snapshot as JSON
//! - `GET /ws`      WebSocket: snapshot on connect, then one per poll cycle
//! - `GET /health`  liveness plus the last poll cycle report
//! - `/static/*`    static assets

mod routes;
mod ws;

use crate::service::Dashboard;
use axum::routing::get;
use axum::Router;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub static_dir: PathBuf,
}

/// Build the router for a dashboard
pub fn router(dashboard: Arc<Dashboard>, static_dir: impl Into<PathBuf>) -> Router {
    let static_dir = static_dir.into();
    let assets = ServeDir::new(&static_dir);
    let state = Arc::new(AppState {
        dashboard,
        static_dir,
    });

    Router::new()
        .route("/", get(routes::index))
        .route("/data", get(routes::get_snapshot))
        .route("/health", get(routes::health))
        .route("/ws", get(ws::websocket_handler))
        .nest_service("/static", assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `router` on `listener` until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Dashboard server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Dashboard server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::warn!("Shutdown signal received");
}
