//! Common test utilities for deployer integration tests
//!
//! This module provides shared test infrastructure including:
//! - Logging setup
//! - Local servers (deploy mock or scripted axum routers) on ephemeral ports
//! - A URL nothing is listening on, for unreachable-server runs
#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;
use token_deployer::{DeployerConfig, Readiness};

pub fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

/// Config pointed at `url` with no startup wait and a short request timeout
pub fn fast_config(url: &str) -> anyhow::Result<DeployerConfig> {
    Ok(DeployerConfig::new(url)?
        .with_readiness(Readiness::FixedDelay(Duration::ZERO))
        .with_request_timeout(Duration::from_secs(5)))
}

/// Serve `router` on an ephemeral localhost port in the background
pub async fn spawn_router(router: axum::Router) -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            log::error!("Scripted server stopped: {}", e);
        }
    });

    Ok(addr)
}

/// URL of a localhost port that was just released, so connections are refused
pub fn unreachable_url() -> anyhow::Result<String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(format!("http://127.0.0.1:{}", port))
}

pub fn url_of(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}
