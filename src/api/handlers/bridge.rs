//! Bridge-asset endpoint and action status lookup.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use crate::api::server::GatewayServer;
use crate::api::types::{BridgeAssetRequest, BridgeSuccessResponse, ErrorResponse, PendingConfirmationResponse};
use crate::api::validators;
use crate::bridge::store::ActionStatus;
use crate::core::errors::BridgeError;

/// POST /api/mcp/bridge-asset
///
/// Confirmed requests get prepared transaction steps; unconfirmed requests
/// get a quote and the confirmation link. Validation failures never touch
/// the provider.
pub async fn bridge_asset(
    State(state): State<Arc<GatewayServer>>,
    Json(payload): Json<BridgeAssetRequest>,
) -> Response {
    let (request, confirmed) = match validators::validate_bridge_asset_request(&payload) {
        Ok(validated) => validated,
        Err(rejection) => return rejection.into_response(),
    };

    if confirmed {
        match state.gateway.prepare(&request).await {
            Ok(prepared) => (
                StatusCode::OK,
                Json(BridgeSuccessResponse {
                    status: "success".to_string(),
                    steps: prepared.steps,
                    transactions: prepared.transactions,
                    transaction_id: prepared.transaction_id,
                }),
            )
                .into_response(),
            Err(err) => error_response(err),
        }
    } else {
        let quote = match state.gateway.quote(&request).await {
            Ok(quote) => quote,
            Err(err) => return error_response(err),
        };
        match state.gateway.confirmation_url(&request) {
            Ok(confirmation_url) => (
                StatusCode::OK,
                Json(PendingConfirmationResponse {
                    status: "pending_confirmation".to_string(),
                    confirmation_url,
                    message: "Review the bridge details and confirm to receive transaction steps."
                        .to_string(),
                    estimate: quote,
                }),
            )
                .into_response(),
            Err(err) => error_response(err),
        }
    }
}

/// GET /api/bridge/action/:id
///
/// Completed actions also carry the provider's settlement view of the final
/// transaction; the lookup is best-effort and the local record stays
/// authoritative when the provider is unreachable.
pub async fn bridge_action_status(
    State(state): State<Arc<GatewayServer>>,
    Path(id): Path<String>,
) -> Response {
    let record = match state.store.get(&id) {
        Ok(record) => record,
        Err(err) => return error_response(err),
    };
    let mut body = match serde_json::to_value(&record) {
        Ok(body) => body,
        Err(err) => return error_response(err.into()),
    };

    if let ActionStatus::Completed { tx_hashes } = &record.status {
        if let Some(final_hash) = tx_hashes.last() {
            match state.gateway.bridge_status(final_hash, record.request.from_chain_id).await {
                Ok(status) => match serde_json::to_value(&status) {
                    Ok(value) => body["providerStatus"] = value,
                    Err(err) => return error_response(err.into()),
                },
                Err(err) => {
                    tracing::debug!(error = %err, "provider status lookup failed");
                }
            }
        }
    }

    (StatusCode::OK, Json(body)).into_response()
}

/// Maps a bridge error onto an HTTP response: 400 for client mistakes, 404
/// for unknown resources, 500 for provider-side and internal failures. The
/// body's `code` carries the finer-grained cause.
fn error_response(err: BridgeError) -> Response {
    let status = match &err {
        BridgeError::ValidationError(_) | BridgeError::UnsupportedChain(_) => {
            StatusCode::BAD_REQUEST
        }
        BridgeError::NotFoundError(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(code = err.code(), error = %err, "bridge request failed");
    } else {
        tracing::debug!(code = err.code(), error = %err, "bridge request rejected");
    }
    (status, Json(ErrorResponse::new(err.to_string(), err.code()))).into_response()
}
