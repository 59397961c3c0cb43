use anyhow::Context;
use token_deployer::{DeployerConfig, Sequencer};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logger (set RUST_LOG=debug for verbose output, RUST_LOG=info for normal)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DeployerConfig::from_env().context("Failed to load configuration")?;
    let mut sequencer = Sequencer::new(config).context("Failed to create deployer")?;

    let reports = sequencer.run().await;

    let succeeded = reports.iter().filter(|r| r.outcome.is_success()).count();
    log::info!("Run complete: {}/{} steps succeeded", succeeded, reports.len());

    Ok(())
}
