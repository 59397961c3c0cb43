/// Axum HTTP server setup and routing

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, AppState};
use crate::state::{MockOptions, MockState};

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/check-server", get(handlers::check_server))
        .route("/check-contract", get(handlers::check_contract))
        .route("/deploy", get(handlers::deploy))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serve in the foreground until the process exits
pub async fn run_server(host: String, port: u16, options: MockOptions) -> anyhow::Result<()> {
    let app = create_router(Arc::new(MockState::new(options)));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("🚀 Deploy mock server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve on an ephemeral localhost port in a background task.
///
/// Returns the bound address and the shared state so callers can inspect
/// what was deployed.
pub async fn spawn(options: MockOptions) -> anyhow::Result<(SocketAddr, AppState)> {
    let state = Arc::new(MockState::new(options));
    let app = create_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            log::error!("Deploy mock server stopped: {}", e);
        }
    });

    log::debug!("Deploy mock server spawned on http://{}", addr);
    Ok((addr, state))
}
