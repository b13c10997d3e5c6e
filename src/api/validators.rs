//! Request validation for the bridge-asset endpoint.
//!
//! All rules live here so handlers stay thin. Validation reports every
//! missing required field at once; nothing reaches the provider until the
//! request is fully well-formed and both chains resolve in the registry.

use axum::{http::StatusCode, response::Json};

use crate::api::types::{BridgeAssetRequest, ErrorResponse};
use crate::bridge::BridgeRequest;
use crate::chains;
use crate::core::validation::{validate_amount_strict, validate_evm_address};

pub type ValidationError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: impl Into<String>, code: &str) -> ValidationError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(error, code)))
}

/// Chain ids are accepted as JSON numbers or numeric strings.
fn parse_chain_id(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Validates the raw payload into a normalized `BridgeRequest` plus the
/// caller's confirmation flag.
pub fn validate_bridge_asset_request(
    payload: &BridgeAssetRequest,
) -> Result<(BridgeRequest, bool), ValidationError> {
    let mut missing = Vec::new();
    if payload.from_chain_id.is_none() {
        missing.push("fromChainId".to_string());
    }
    if payload.to_chain_id.is_none() {
        missing.push("toChainId".to_string());
    }
    if payload.from_token_address.is_none() {
        missing.push("fromTokenAddress".to_string());
    }
    if payload.to_token_address.is_none() {
        missing.push("toTokenAddress".to_string());
    }
    if payload.amount.is_none() {
        missing.push("amount".to_string());
    }
    if !missing.is_empty() {
        return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::missing_params(missing))));
    }

    let from_chain_id = payload
        .from_chain_id
        .as_ref()
        .and_then(parse_chain_id)
        .ok_or_else(|| bad_request("fromChainId must be a positive integer", "INVALID_INPUT"))?;
    let to_chain_id = payload
        .to_chain_id
        .as_ref()
        .and_then(parse_chain_id)
        .ok_or_else(|| bad_request("toChainId must be a positive integer", "INVALID_INPUT"))?;

    if chains::lookup(from_chain_id).is_none() || chains::lookup(to_chain_id).is_none() {
        return Err(bad_request("Unsupported chain ID provided.", "UNSUPPORTED_CHAIN"));
    }

    let from_token_address = payload.from_token_address.clone().unwrap_or_default();
    let to_token_address = payload.to_token_address.clone().unwrap_or_default();
    let amount = payload.amount.clone().unwrap_or_default();

    if validate_evm_address(&from_token_address).is_err() {
        return Err(bad_request("Invalid fromTokenAddress", "INVALID_INPUT"));
    }
    if validate_evm_address(&to_token_address).is_err() {
        return Err(bad_request("Invalid toTokenAddress", "INVALID_INPUT"));
    }
    if let Some(to_address) = payload.to_address.as_deref() {
        if validate_evm_address(to_address).is_err() {
            return Err(bad_request("Invalid toAddress", "INVALID_INPUT"));
        }
    }
    if validate_amount_strict(&amount, 18).is_err() {
        return Err(bad_request("Invalid amount", "INVALID_INPUT"));
    }

    let request = BridgeRequest {
        from_chain_id,
        to_chain_id,
        from_token_address,
        to_token_address,
        amount,
        to_address: payload.to_address.clone(),
    };
    Ok((request, payload.confirmed))
}
