/// In-memory contract registry shared by the handlers

use std::sync::Mutex;
use thiserror::Error;

use crate::types::{ContractRecord, DeployQuery};

/// Owner reported for every contract the mock deploys
pub const MOCK_OWNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DeployQueryError {
    #[error("Missing query parameter: {0}")]
    Missing(&'static str),

    #[error("Invalid query parameter {name}: '{value}' is not an unsigned integer")]
    NotAnInteger { name: &'static str, value: String },
}

/// A forced response for an endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedFailure {
    pub status: u16,
    pub body: String,
}

/// Knobs for tests and local runs
#[derive(Debug, Clone, Default)]
pub struct MockOptions {
    /// Answer /deploy with this status and body instead of deploying
    pub fail_deploy: Option<InjectedFailure>,
}

impl MockOptions {
    pub fn failing_deploy(status: u16, body: impl Into<String>) -> Self {
        Self {
            fail_deploy: Some(InjectedFailure {
                status,
                body: body.into(),
            }),
        }
    }
}

#[derive(Debug, Default)]
struct Registry {
    current: Option<ContractRecord>,
    deployments: u64,
}

/// Shared server state
#[derive(Debug, Default)]
pub struct MockState {
    pub options: MockOptions,
    registry: Mutex<Registry>,
}

impl MockState {
    pub fn new(options: MockOptions) -> Self {
        Self {
            options,
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Currently deployed contract, if any
    pub fn current(&self) -> anyhow::Result<Option<ContractRecord>> {
        let registry = self
            .registry
            .lock()
            .map_err(|_| anyhow::anyhow!("contract registry lock poisoned"))?;
        Ok(registry.current.clone())
    }

    /// Number of successful deployments so far
    pub fn deployments(&self) -> anyhow::Result<u64> {
        let registry = self
            .registry
            .lock()
            .map_err(|_| anyhow::anyhow!("contract registry lock poisoned"))?;
        Ok(registry.deployments)
    }

    /// Record a new deployment, replacing the previous contract
    pub fn deploy(&self, params: &ValidatedDeploy) -> anyhow::Result<ContractRecord> {
        let mut registry = self
            .registry
            .lock()
            .map_err(|_| anyhow::anyhow!("contract registry lock poisoned"))?;

        registry.deployments += 1;
        let n = registry.deployments;

        // Token and distribution contracts are deployed together, so each
        // deployment consumes two addresses.
        let record = ContractRecord {
            contract: mock_address(2 * n),
            owner: MOCK_OWNER.to_string(),
            recipient: params.recipient_address.clone(),
            timeout: params.timeout.to_string(),
            validators_threshold: params.validators_threshold.to_string(),
            token_address: mock_address(2 * n - 1),
            current_request_validators: "0".to_string(),
            current_request_block: "0".to_string(),
        };
        registry.current = Some(record.clone());

        Ok(record)
    }
}

/// Deterministic 20-byte address for the n-th deployed contract
pub fn mock_address(n: u64) -> String {
    format!("0x{:040x}", n)
}

/// A /deploy query that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDeploy {
    pub validators_threshold: u64,
    pub timeout: u64,
    pub recipient_address: String,
}

impl TryFrom<DeployQuery> for ValidatedDeploy {
    type Error = DeployQueryError;

    fn try_from(query: DeployQuery) -> Result<Self, Self::Error> {
        let validators_threshold = parse_uint(
            "validatorsThreshold",
            query.validators_threshold,
        )?;
        let timeout = parse_uint("timeout", query.timeout)?;
        let recipient_address = query
            .recipient_address
            .filter(|r| !r.is_empty())
            .ok_or(DeployQueryError::Missing("recipientAddress"))?;

        Ok(Self {
            validators_threshold,
            timeout,
            recipient_address,
        })
    }
}

fn parse_uint(name: &'static str, value: Option<String>) -> Result<u64, DeployQueryError> {
    let value = value.ok_or(DeployQueryError::Missing(name))?;
    value
        .parse()
        .map_err(|_| DeployQueryError::NotAnInteger { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(threshold: Option<&str>, timeout: Option<&str>, recipient: Option<&str>) -> DeployQuery {
        DeployQuery {
            validators_threshold: threshold.map(String::from),
            timeout: timeout.map(String::from),
            recipient_address: recipient.map(String::from),
        }
    }

    #[test]
    fn test_validates_complete_query() {
        let validated = ValidatedDeploy::try_from(query(Some("5"), Some("400"), Some("0xabc"))).unwrap();
        assert_eq!(validated.validators_threshold, 5);
        assert_eq!(validated.timeout, 400);
        assert_eq!(validated.recipient_address, "0xabc");
    }

    #[test]
    fn test_rejects_missing_and_malformed() {
        assert_eq!(
            ValidatedDeploy::try_from(query(None, Some("400"), Some("0xabc"))),
            Err(DeployQueryError::Missing("validatorsThreshold"))
        );
        assert_eq!(
            ValidatedDeploy::try_from(query(Some("5"), Some("-3"), Some("0xabc"))),
            Err(DeployQueryError::NotAnInteger {
                name: "timeout",
                value: "-3".to_string()
            })
        );
        assert_eq!(
            ValidatedDeploy::try_from(query(Some("5"), Some("400"), Some(""))),
            Err(DeployQueryError::Missing("recipientAddress"))
        );
    }

    #[test]
    fn test_deploy_replaces_current_contract() {
        let state = MockState::default();
        assert!(state.current().unwrap().is_none());

        let params = ValidatedDeploy {
            validators_threshold: 5,
            timeout: 400,
            recipient_address: "0xabc".to_string(),
        };
        let first = state.deploy(&params).unwrap();
        let second = state.deploy(&params).unwrap();

        assert_ne!(first.contract, second.contract);
        assert_eq!(state.current().unwrap(), Some(second));
        assert_eq!(state.deployments().unwrap(), 2);
    }

    #[test]
    fn test_mock_address_format() {
        let address = mock_address(2);
        assert_eq!(address.len(), 42);
        assert!(address.starts_with("0x"));
        assert!(address.ends_with("02"));
    }
}
