//! Health and MCP discovery handlers.

use serde_json::json;

use crate::chains;

pub async fn health_check() -> axum::response::Json<serde_json::Value> {
    axum::response::Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// MCP server descriptor: what this gateway exposes and how to call it.
pub async fn mcp_server_info() -> axum::response::Json<serde_json::Value> {
    axum::response::Json(json!({
        "name": "nullbridge",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Cross-chain bridge gateway for MCP clients",
        "tools": [{
            "name": "bridge-asset",
            "method": "POST",
            "path": "/api/mcp/bridge-asset",
            "description": "Bridge a token between two supported chains. \
                Without confirmed=true the response carries a confirmation URL \
                instead of transaction steps.",
            "parameters": {
                "required": ["fromChainId", "toChainId", "fromTokenAddress", "toTokenAddress", "amount"],
                "optional": ["toAddress", "confirmed"]
            }
        }],
        "supportedChains": chains::supported()
    }))
}
