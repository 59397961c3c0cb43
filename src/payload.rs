//! Typed views over the server's JSON payloads
//!
//! The server is loose about shapes (numbers arrive as strings, fields come and
//! go between versions) so every field is optional and unknown fields are
//! ignored.

use serde::{Deserialize, Serialize};

/// Body of `GET /check-server`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerStatus {
    pub status: String,
}

/// Body of `GET /check-contract`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractState {
    #[serde(default, alias = "contractAddress")]
    pub contract: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub timeout: Option<String>,
    #[serde(default)]
    pub validators_threshold: Option<String>,
    #[serde(default)]
    pub token_address: Option<String>,
    #[serde(default)]
    pub current_request_validators: Option<String>,
    #[serde(default)]
    pub current_request_block: Option<String>,
}

/// Body of a successful `GET /deploy`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeployReceipt {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(alias = "address")]
    pub contract_address: String,
}

/// A parameter that the contract reports differently from what was sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMismatch {
    pub field: &'static str,
    pub sent: String,
    pub reported: String,
}

impl ContractState {
    /// Compare the reported contract parameters with the ones sent to deploy.
    ///
    /// Fields the server did not report are skipped.
    pub fn mismatches(
        &self,
        params: &crate::DeploymentParameters,
    ) -> Vec<ParameterMismatch> {
        let checks = [
            (
                "validators_threshold",
                params.validators_threshold().to_string(),
                self.validators_threshold.as_deref(),
            ),
            ("timeout", params.timeout().to_string(), self.timeout.as_deref()),
            (
                "recipient",
                params.recipient_address().to_string(),
                self.recipient.as_deref(),
            ),
        ];

        checks
            .into_iter()
            .filter_map(|(field, sent, reported)| {
                let reported = reported?;
                let matches = if field == "recipient" {
                    reported.eq_ignore_ascii_case(&sent)
                } else {
                    reported == sent
                };
                (!matches).then(|| ParameterMismatch {
                    field,
                    sent,
                    reported: reported.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeploymentParameters;
    use serde_json::json;

    #[test]
    fn test_empty_contract_state() {
        let state: ContractState = serde_json::from_value(json!({"contract": null})).unwrap();
        assert_eq!(state, ContractState::default());
    }

    #[test]
    fn test_full_contract_state() {
        let state: ContractState = serde_json::from_value(json!({
            "owner": "0x01",
            "recipient": "0x60fc3e6ad91fc02efa77e91b207603c4c397532f",
            "timeout": "400",
            "validators_threshold": "5",
            "token_address": "0x02",
            "current_request_validators": "0",
            "current_request_block": "0"
        }))
        .unwrap();

        assert_eq!(state.owner.as_deref(), Some("0x01"));
        assert!(state.mismatches(&DeploymentParameters::default()).is_empty());
    }

    #[test]
    fn test_mismatch_reported() {
        let state = ContractState {
            timeout: Some("200".to_string()),
            ..Default::default()
        };
        let mismatches = state.mismatches(&DeploymentParameters::default());
        assert_eq!(
            mismatches,
            vec![ParameterMismatch {
                field: "timeout",
                sent: "400".to_string(),
                reported: "200".to_string(),
            }]
        );
    }

    #[test]
    fn test_deploy_receipt_aliases() {
        let receipt: DeployReceipt = serde_json::from_value(json!({
            "status": "Success",
            "message": "Contract sucessfully deployed on the network.",
            "contractAddress": "0xABC"
        }))
        .unwrap();
        assert_eq!(receipt.contract_address, "0xABC");

        let short: DeployReceipt = serde_json::from_value(json!({"address": "0xABC"})).unwrap();
        assert_eq!(short.contract_address, "0xABC");
        assert!(short.status.is_none());
    }
}
