//! HTTP dispatch of a single server action

use reqwest::{StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

use crate::action::EndpointAction;
use crate::error::DeployerError;
use crate::outcome::Outcome;
use crate::params::DeploymentParameters;

/// Issues one GET per action against the deployment server and classifies
/// the result. Never retries.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    /// reqwest::Client is internally Arc-based
    client: reqwest::Client,
    base_url: Url,
}

impl Dispatcher {
    pub fn new(base_url: Url, request_timeout: Duration) -> Result<Self, DeployerError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send `action` (with optional deploy parameters) and reduce the response
    /// to exactly one [`Outcome`].
    pub async fn dispatch(
        &self,
        action: EndpointAction,
        params: Option<&DeploymentParameters>,
    ) -> Outcome {
        let url = action.url(&self.base_url, params);
        log::debug!("{}: GET {}", action, url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                log::debug!("{}: request failed: {}", action, e);
                return Outcome::Unreachable;
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                log::debug!("{}: failed to read response body: {}", action, e);
                return Outcome::Unreachable;
            }
        };

        if status != StatusCode::OK {
            log::debug!("{}: server returned {}", action, status);
            return Outcome::ServerError {
                status: status.as_u16(),
                body: text,
            };
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Outcome::Success(value),
            Err(e) => {
                log::warn!("{}: 200 response is not JSON ({}), keeping raw text", action, e);
                Outcome::Success(Value::String(text))
            }
        }
    }

    /// `GET /check-server`
    pub async fn check_server(&self) -> Outcome {
        self.dispatch(EndpointAction::CheckServer, None).await
    }

    /// `GET /check-contract`
    pub async fn check_contract(&self) -> Outcome {
        self.dispatch(EndpointAction::CheckContract, None).await
    }

    /// `GET /deploy?validatorsThreshold=..&timeout=..&recipientAddress=..`
    pub async fn deploy(&self, params: &DeploymentParameters) -> Outcome {
        self.dispatch(EndpointAction::Deploy, Some(params)).await
    }
}
