/// Deploy Mock Server
///
/// Serves /check-server, /check-contract and /deploy from memory so the
/// deployer can be run locally without a blockchain node.

use anyhow::{Context, Result};
use deploy_mock::{run_server, InjectedFailure, MockOptions};
use std::env;

#[derive(Debug)]
struct Config {
    server_host: String,
    server_port: u16,
    fail_deploy: Option<InjectedFailure>,
}

impl Config {
    fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let server_host = env::var("MOCK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("MOCK_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .context("Invalid MOCK_PORT")?;

        // e.g. MOCK_FAIL_DEPLOY="500:insufficient funds"
        let fail_deploy = match env::var("MOCK_FAIL_DEPLOY") {
            Ok(raw) => {
                let (status, body) = raw
                    .split_once(':')
                    .context("MOCK_FAIL_DEPLOY must look like <status>:<body>")?;
                Some(InjectedFailure {
                    status: status.trim().parse().context("Invalid MOCK_FAIL_DEPLOY status")?,
                    body: body.to_string(),
                })
            }
            Err(_) => None,
        };

        Ok(Self {
            server_host,
            server_port,
            fail_deploy,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting deploy mock server...");

    let config = Config::from_env().context("Failed to load configuration")?;
    if let Some(failure) = &config.fail_deploy {
        log::warn!("/deploy will fail with {} {}", failure.status, failure.body);
    }

    run_server(
        config.server_host,
        config.server_port,
        MockOptions {
            fail_deploy: config.fail_deploy,
        },
    )
    .await
    .context("Server error")?;

    Ok(())
}
