//! Error types for the deployment client
//!
//! Step-level failures (server errors, unreachable server) are not errors here:
//! they are [`Outcome`](crate::Outcome) variants. This type only covers what can
//! go wrong before the first request is sent.

use thiserror::Error;

/// Core error type for setting up a deployment run
#[derive(Error, Debug)]
pub enum DeployerError {
    /// Server URL could not be parsed or cannot carry path segments
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },

    /// A configuration value was present but malformed
    #[error("Invalid value for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    /// Deployment parameters failed validation
    #[error("Invalid deployment parameters: {0}")]
    InvalidParameters(String),

    /// The underlying HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl DeployerError {
    /// Create an invalid configuration error
    pub fn invalid_config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid server URL error
    pub fn invalid_server_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidServerUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message() {
        let err = DeployerError::invalid_config("DEPLOYER_TIMEOUT_BLOCKS", "not a number");
        assert_eq!(
            err.to_string(),
            "Invalid value for DEPLOYER_TIMEOUT_BLOCKS: not a number"
        );
    }
}
