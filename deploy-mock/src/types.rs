/// Deployment server response types
///
/// Shaped like the token distribution server's payloads. /check-contract adds
/// a `contract` field, null until something is deployed, where the real server
/// answers 500 when no contract is readable. That keeps the empty state and the
/// freshly deployed address observable as 200 responses.

use serde::{Deserialize, Serialize};

/// Query string of /deploy
///
/// Kept as raw strings so validation errors can be reported as plain text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployQuery {
    pub validators_threshold: Option<String>,
    pub timeout: Option<String>,
    pub recipient_address: Option<String>,
}

/// Response from /check-server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStatusResponse {
    pub status: String,
}

/// A deployed contract as tracked by the mock
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractRecord {
    pub contract: String,
    pub owner: String,
    pub recipient: String,
    pub timeout: String,
    pub validators_threshold: String,
    pub token_address: String,
    pub current_request_validators: String,
    pub current_request_block: String,
}

/// Response from /check-contract
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContractResponse {
    Deployed(ContractRecord),
    Empty { contract: Option<String> },
}

/// Response from /deploy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResponse {
    pub status: String,
    pub message: String,
    pub contract_address: String,
}
