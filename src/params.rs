//! Parameters carried by a deploy request

use reqwest::Url;
use serde::Serialize;

use crate::error::DeployerError;

/// Default number of validators required to approve a request
pub const DEFAULT_VALIDATORS_THRESHOLD: u64 = 5;

/// Default request timeout on chain, in blocks
pub const DEFAULT_TIMEOUT_BLOCKS: u64 = 400;

/// Default recipient of distributed tokens
pub const DEFAULT_RECIPIENT_ADDRESS: &str = "0x60FC3E6Ad91Fc02Efa77E91b207603C4C397532f";

/// Threshold, timeout and recipient sent to the deploy endpoint.
///
/// Fields are private so a value can only exist once validated. The recipient
/// is otherwise opaque: it is sent exactly as given.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentParameters {
    validators_threshold: u64,
    timeout: u64,
    recipient_address: String,
}

impl DeploymentParameters {
    /// Validate and build a parameter set
    pub fn new(
        validators_threshold: u64,
        timeout: u64,
        recipient_address: impl Into<String>,
    ) -> Result<Self, DeployerError> {
        let recipient_address = recipient_address.into();

        if recipient_address.is_empty() {
            return Err(DeployerError::InvalidParameters(
                "recipient address is empty".to_string(),
            ));
        }
        if recipient_address.trim() != recipient_address {
            return Err(DeployerError::InvalidParameters(format!(
                "recipient address has surrounding whitespace: {:?}",
                recipient_address
            )));
        }

        Ok(Self {
            validators_threshold,
            timeout,
            recipient_address,
        })
    }

    pub fn validators_threshold(&self) -> u64 {
        self.validators_threshold
    }

    /// Timeout in blocks
    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn recipient_address(&self) -> &str {
        &self.recipient_address
    }

    /// Query pairs in the order the server expects them
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("validatorsThreshold", self.validators_threshold.to_string()),
            ("timeout", self.timeout.to_string()),
            ("recipientAddress", self.recipient_address.clone()),
        ]
    }

    /// Append the query pairs to `url`, keeping any pairs already present
    pub fn append_to(&self, url: &mut Url) {
        let mut query = url.query_pairs_mut();
        for (key, value) in self.query_pairs() {
            query.append_pair(key, &value);
        }
    }
}

impl Default for DeploymentParameters {
    fn default() -> Self {
        Self {
            validators_threshold: DEFAULT_VALIDATORS_THRESHOLD,
            timeout: DEFAULT_TIMEOUT_BLOCKS,
            recipient_address: DEFAULT_RECIPIENT_ADDRESS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = DeploymentParameters::default();
        assert_eq!(params.validators_threshold(), 5);
        assert_eq!(params.timeout(), 400);
        assert_eq!(params.recipient_address(), DEFAULT_RECIPIENT_ADDRESS);
    }

    #[test]
    fn test_rejects_empty_recipient() {
        let result = DeploymentParameters::new(5, 400, "");
        assert!(matches!(result, Err(DeployerError::InvalidParameters(_))));
    }

    #[test]
    fn test_rejects_padded_recipient() {
        let result = DeploymentParameters::new(5, 400, " 0xabc ");
        assert!(matches!(result, Err(DeployerError::InvalidParameters(_))));
    }

    #[test]
    fn test_query_pairs_order() {
        let params = DeploymentParameters::new(3, 100, "0xdead").unwrap();
        let keys: Vec<_> = params.query_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["validatorsThreshold", "timeout", "recipientAddress"]);
    }

    #[test]
    fn test_append_to_url() {
        let params = DeploymentParameters::default();
        let mut url = Url::parse("http://server:5000/deploy").unwrap();
        params.append_to(&mut url);
        assert_eq!(
            url.as_str(),
            "http://server:5000/deploy?validatorsThreshold=5&timeout=400&recipientAddress=0x60FC3E6Ad91Fc02Efa77E91b207603C4C397532f"
        );
    }
}
