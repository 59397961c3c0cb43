/// Axum HTTP handlers for the deployment server endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::state::{DeployQueryError, MockState, ValidatedDeploy};
use crate::types::*;

/// Shared application state
pub type AppState = Arc<MockState>;

/// Custom error type for handlers
pub enum ApiError {
    BadRequest(String),
    Injected(StatusCode, String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Injected(status, msg) => (status, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, message).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<DeployQueryError> for ApiError {
    fn from(err: DeployQueryError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// GET /check-server
/// Liveness probe
pub async fn check_server() -> Json<ServerStatusResponse> {
    Json(ServerStatusResponse {
        status: "Server is up and running".to_string(),
    })
}

/// GET /check-contract
/// Returns the current contract, or `{"contract": null}` before any deployment
pub async fn check_contract(
    State(state): State<AppState>,
) -> Result<Json<ContractResponse>, ApiError> {
    let response = match state.current()? {
        Some(record) => ContractResponse::Deployed(record),
        None => ContractResponse::Empty { contract: None },
    };
    Ok(Json(response))
}

/// GET /deploy?validatorsThreshold=..&timeout=..&recipientAddress=..
/// Deploys a new contract and makes it the current one
pub async fn deploy(
    State(state): State<AppState>,
    Query(query): Query<DeployQuery>,
) -> Result<Json<DeployResponse>, ApiError> {
    if let Some(failure) = &state.options.fail_deploy {
        let status = StatusCode::from_u16(failure.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        log::info!("Injected deploy failure: {} {}", status, failure.body);
        return Err(ApiError::Injected(status, failure.body.clone()));
    }

    let params = ValidatedDeploy::try_from(query)?;
    log::info!(
        "Deploying: threshold={}, timeout={}, recipient={}",
        params.validators_threshold,
        params.timeout,
        params.recipient_address
    );

    let record = state.deploy(&params)?;
    log::info!("Token distribution contract address: {}", record.contract);

    Ok(Json(DeployResponse {
        status: "Success".to_string(),
        message: "Contract sucessfully deployed on the network.".to_string(),
        contract_address: record.contract,
    }))
}
