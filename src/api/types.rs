//! Shared request/response types for the HTTP surface.

use serde::{Deserialize, Serialize};

use crate::bridge::provider::ProviderQuote;
use crate::bridge::{PreparedStep, PreparedTransaction};

/// Incoming bridge-asset payload, exactly as the MCP client sends it.
///
/// Everything is optional at the wire level so validation can enumerate which
/// required fields are missing instead of failing on the first one. Chain ids
/// arrive as JSON numbers or numeric strings depending on the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeAssetRequest {
    pub from_chain_id: Option<serde_json::Value>,
    pub to_chain_id: Option<serde_json::Value>,
    pub from_token_address: Option<String>,
    pub to_token_address: Option<String>,
    pub amount: Option<String>,
    pub to_address: Option<String>,
    #[serde(default)]
    pub confirmed: bool,
}

/// Uniform error body. `missing` is only present on missing-parameter errors.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self { status: "failed".to_string(), error: error.into(), code: code.into(), missing: None }
    }

    pub fn missing_params(missing: Vec<String>) -> Self {
        Self {
            status: "failed".to_string(),
            error: "Missing required parameters".to_string(),
            code: "INVALID_INPUT".to_string(),
            missing: Some(missing),
        }
    }
}

/// Confirmed bridge: provider steps plus the flattened transaction list and
/// the action id clients can poll.
#[derive(Debug, Serialize, Deserialize)]
pub struct BridgeSuccessResponse {
    pub status: String,
    pub steps: Vec<PreparedStep>,
    pub transactions: Vec<PreparedTransaction>,
    #[serde(rename = "transactionId")]
    pub transaction_id: String,
}

/// Unconfirmed bridge: quote plus the link where the user approves it.
#[derive(Debug, Serialize, Deserialize)]
pub struct PendingConfirmationResponse {
    pub status: String,
    #[serde(rename = "confirmationUrl")]
    pub confirmation_url: String,
    pub message: String,
    pub estimate: ProviderQuote,
}
