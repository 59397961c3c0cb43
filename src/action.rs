//! Server operations and target URL construction

use reqwest::Url;
use std::fmt;

use crate::params::DeploymentParameters;

/// One of the three operations exposed by the deployment server
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndpointAction {
    /// Liveness probe
    CheckServer,
    /// Inspect the currently deployed contract
    CheckContract,
    /// Deploy a new contract with parameters
    Deploy,
}

impl EndpointAction {
    /// Path segment appended to the server URL
    pub const fn path_segment(&self) -> &'static str {
        match self {
            Self::CheckServer => "check-server",
            Self::CheckContract => "check-contract",
            Self::Deploy => "deploy",
        }
    }

    /// Build the target URL for this action.
    ///
    /// Pure: the same base, action and parameters always give the same URL.
    /// `base` must be able to carry path segments, which
    /// [`DeployerConfig`](crate::DeployerConfig) checks when it parses the
    /// server URL.
    pub fn url(&self, base: &Url, params: Option<&DeploymentParameters>) -> Url {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);

        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(self.path_segment());
        }

        if let Some(params) = params {
            params.append_to(&mut url);
        }

        url
    }
}

impl fmt::Display for EndpointAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://server:5000").unwrap()
    }

    #[test]
    fn test_plain_actions() {
        assert_eq!(
            EndpointAction::CheckServer.url(&base(), None).as_str(),
            "http://server:5000/check-server"
        );
        assert_eq!(
            EndpointAction::CheckContract.url(&base(), None).as_str(),
            "http://server:5000/check-contract"
        );
    }

    #[test]
    fn test_base_with_path_prefix() {
        let base = Url::parse("http://localhost:8080/api/").unwrap();
        assert_eq!(
            EndpointAction::CheckServer.url(&base, None).as_str(),
            "http://localhost:8080/api/check-server"
        );

        let base = Url::parse("http://localhost:8080/api").unwrap();
        assert_eq!(
            EndpointAction::CheckServer.url(&base, None).as_str(),
            "http://localhost:8080/api/check-server"
        );
    }

    #[test]
    fn test_deploy_url_has_three_ordered_pairs() {
        let params = DeploymentParameters::new(5, 400, "0xABCdef0123").unwrap();
        let url = EndpointAction::Deploy.url(&base(), Some(&params));

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("validatorsThreshold".to_string(), "5".to_string()),
                ("timeout".to_string(), "400".to_string()),
                ("recipientAddress".to_string(), "0xABCdef0123".to_string()),
            ]
        );
        assert_eq!(
            url.query(),
            Some("validatorsThreshold=5&timeout=400&recipientAddress=0xABCdef0123")
        );
    }

    #[test]
    fn test_recipient_survives_query_escaping() {
        let recipient = "addr/with&odd=chars+é";
        let params = DeploymentParameters::new(1, 2, recipient).unwrap();
        let url = EndpointAction::Deploy.url(&base(), Some(&params));

        let decoded = url
            .query_pairs()
            .find(|(k, _)| k == "recipientAddress")
            .map(|(_, v)| v.into_owned());
        assert_eq!(decoded.as_deref(), Some(recipient));
    }

    #[test]
    fn test_deploy_url_is_pure() {
        let params = DeploymentParameters::default();
        let first = EndpointAction::Deploy.url(&base(), Some(&params));
        let second = EndpointAction::Deploy.url(&base(), Some(&params));
        assert_eq!(first.as_str(), second.as_str());
    }

    #[test]
    fn test_base_query_is_dropped() {
        let base = Url::parse("http://server:5000/?stale=1").unwrap();
        assert_eq!(
            EndpointAction::CheckContract.url(&base, None).as_str(),
            "http://server:5000/check-contract"
        );
    }
}
