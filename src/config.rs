//! Deployer configuration from environment variables
//!
//! Controls the target server, the deploy parameters and how long to wait for
//! the server before the first request. Defaults match a server launched next
//! to the client as `server:5000`.

use reqwest::Url;
use std::env;
use std::time::Duration;

use crate::error::DeployerError;
use crate::params::{
    DeploymentParameters, DEFAULT_RECIPIENT_ADDRESS, DEFAULT_TIMEOUT_BLOCKS,
    DEFAULT_VALIDATORS_THRESHOLD,
};

pub const DEFAULT_SERVER_URL: &str = "http://server:5000";
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How the sequencer waits for the server before the first step
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// Sleep once, then proceed
    FixedDelay(Duration),

    /// Probe `check-server` until it answers or attempts run out, then proceed
    Poll { interval: Duration, max_attempts: u32 },
}

/// Which steps a run performs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SequencePlan {
    /// Status, contract, deploy, contract
    #[default]
    Full,
    /// Status and contract only
    InspectOnly,
}

#[derive(Clone, Debug)]
pub struct DeployerConfig {
    /// Base URL of the deployment server
    pub server_url: Url,
    /// Parameters sent with the deploy step
    pub deployment: DeploymentParameters,
    pub readiness: Readiness,
    /// Per-request timeout; bounds how long a single step can block
    pub request_timeout: Duration,
    pub plan: SequencePlan,
}

impl DeployerConfig {
    /// Build a configuration for `server_url` with default parameters
    pub fn new(server_url: &str) -> Result<Self, DeployerError> {
        Ok(Self {
            server_url: parse_server_url(server_url)?,
            ..Self::default()
        })
    }

    /// Load configuration from environment variables
    ///
    /// Environment variables (a `.env` file is read first if present):
    /// - `DEPLOYER_SERVER_URL`: base server URL (default `http://server:5000`)
    /// - `DEPLOYER_VALIDATORS_THRESHOLD`: deploy parameter (default 5)
    /// - `DEPLOYER_TIMEOUT_BLOCKS`: deploy parameter (default 400)
    /// - `DEPLOYER_RECIPIENT_ADDRESS`: deploy parameter
    /// - `DEPLOYER_STARTUP_DELAY_SECS`: fixed wait before the first step (default 10)
    /// - `DEPLOYER_READINESS_POLL_ATTEMPTS`: poll `check-server` instead of sleeping
    /// - `DEPLOYER_READINESS_POLL_INTERVAL_MS`: delay between polls (default 1000)
    /// - `DEPLOYER_REQUEST_TIMEOUT_SECS`: per-request timeout (default 30)
    /// - `DEPLOYER_INSPECT_ONLY`: skip the deploy step when true
    ///
    /// Values are trimmed and an empty value counts as unset.
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Local server, no startup wait
    /// DEPLOYER_SERVER_URL=http://localhost:5000 DEPLOYER_STARTUP_DELAY_SECS=0 cargo run
    /// ```
    pub fn from_env() -> Result<Self, DeployerError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DeployerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let server_url = get("DEPLOYER_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let server_url = parse_server_url(&server_url)?;
        log::info!("Deployment server: {}", server_url);

        let validators_threshold = parse_or(
            "DEPLOYER_VALIDATORS_THRESHOLD",
            get("DEPLOYER_VALIDATORS_THRESHOLD"),
            DEFAULT_VALIDATORS_THRESHOLD,
        )?;
        let timeout = parse_or(
            "DEPLOYER_TIMEOUT_BLOCKS",
            get("DEPLOYER_TIMEOUT_BLOCKS"),
            DEFAULT_TIMEOUT_BLOCKS,
        )?;
        let recipient = get("DEPLOYER_RECIPIENT_ADDRESS")
            .unwrap_or_else(|| DEFAULT_RECIPIENT_ADDRESS.to_string());
        let deployment = DeploymentParameters::new(validators_threshold, timeout, recipient)?;

        let readiness = match get("DEPLOYER_READINESS_POLL_ATTEMPTS") {
            Some(raw) => {
                let max_attempts = parse_value("DEPLOYER_READINESS_POLL_ATTEMPTS", &raw)?;
                if max_attempts == 0 {
                    return Err(DeployerError::invalid_config(
                        "DEPLOYER_READINESS_POLL_ATTEMPTS",
                        "must be at least 1",
                    ));
                }
                let interval_ms = parse_or(
                    "DEPLOYER_READINESS_POLL_INTERVAL_MS",
                    get("DEPLOYER_READINESS_POLL_INTERVAL_MS"),
                    DEFAULT_POLL_INTERVAL.as_millis() as u64,
                )?;
                Readiness::Poll {
                    interval: Duration::from_millis(interval_ms),
                    max_attempts,
                }
            }
            None => {
                let secs = parse_or(
                    "DEPLOYER_STARTUP_DELAY_SECS",
                    get("DEPLOYER_STARTUP_DELAY_SECS"),
                    DEFAULT_STARTUP_DELAY.as_secs(),
                )?;
                Readiness::FixedDelay(Duration::from_secs(secs))
            }
        };

        let request_timeout = Duration::from_secs(parse_or(
            "DEPLOYER_REQUEST_TIMEOUT_SECS",
            get("DEPLOYER_REQUEST_TIMEOUT_SECS"),
            DEFAULT_REQUEST_TIMEOUT.as_secs(),
        )?);
        if request_timeout.is_zero() {
            return Err(DeployerError::invalid_config(
                "DEPLOYER_REQUEST_TIMEOUT_SECS",
                "must be at least 1",
            ));
        }

        let plan = match get("DEPLOYER_INSPECT_ONLY").map(|v| v.to_lowercase()) {
            None => SequencePlan::Full,
            Some(v) if matches!(v.as_str(), "0" | "false" | "no") => SequencePlan::Full,
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes") => {
                log::info!("Inspect-only run, deploy step disabled");
                SequencePlan::InspectOnly
            }
            Some(other) => {
                return Err(DeployerError::invalid_config(
                    "DEPLOYER_INSPECT_ONLY",
                    format!("expected true or false, got '{}'", other),
                ))
            }
        };

        Ok(Self {
            server_url,
            deployment,
            readiness,
            request_timeout,
            plan,
        })
    }

    pub fn with_deployment(mut self, deployment: DeploymentParameters) -> Self {
        self.deployment = deployment;
        self
    }

    pub fn with_readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = readiness;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_plan(mut self, plan: SequencePlan) -> Self {
        self.plan = plan;
        self
    }
}

impl Default for DeployerConfig {
    fn default() -> Self {
        Self {
            server_url: Url::parse(DEFAULT_SERVER_URL).expect("default server URL is valid"),
            deployment: DeploymentParameters::default(),
            readiness: Readiness::FixedDelay(DEFAULT_STARTUP_DELAY),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            plan: SequencePlan::Full,
        }
    }
}

/// Parse a server URL and check it can carry the action path segments
pub fn parse_server_url(raw: &str) -> Result<Url, DeployerError> {
    let url = Url::parse(raw).map_err(|e| DeployerError::invalid_server_url(raw, e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(DeployerError::invalid_server_url(
            raw,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(DeployerError::invalid_server_url(raw, "missing host"));
    }

    Ok(url)
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, DeployerError>
where
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e: T::Err| DeployerError::invalid_config(key, format!("'{}': {}", raw, e)))
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, DeployerError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}
