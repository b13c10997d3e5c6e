//! thirdweb bridge API integration.
//!
//! The provider owns route discovery, quoting, and step construction; this
//! client only shapes requests and parses responses into typed structures.
//! Provider failures are never retried here.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::bridge::PreparedStep;
use crate::core::config::ProviderConfig;
use crate::core::errors::BridgeError;

/// thirdweb bridge API client.
pub struct ThirdwebClient {
    client: Client,
    base_url: String,
}

/// Body for quote/prepare calls. `amountWei` is always a decimal string; the
/// provider's current contract is authoritative (earlier revisions of the
/// upstream service disagreed on field names).
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSwapRequest {
    #[serde(rename = "originChainId")]
    pub origin_chain_id: u64,
    #[serde(rename = "destinationChainId")]
    pub destination_chain_id: u64,
    #[serde(rename = "originTokenAddress")]
    pub origin_token_address: String,
    #[serde(rename = "destinationTokenAddress")]
    pub destination_token_address: String,
    #[serde(rename = "amountWei")]
    pub amount_wei: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
}

/// A route between two chains, as listed by the provider.
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct ProviderRoute {
    #[serde(rename = "originChainId")]
    pub origin_chain_id: u64,
    #[serde(rename = "destinationChainId")]
    pub destination_chain_id: u64,
    #[serde(rename = "originTokenAddress", default)]
    pub origin_token_address: Option<String>,
    #[serde(rename = "destinationTokenAddress", default)]
    pub destination_token_address: Option<String>,
}

/// Quote for an unconfirmed bridge request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderQuote {
    #[serde(rename = "originAmount")]
    pub origin_amount: String,
    #[serde(rename = "destinationAmount")]
    pub destination_amount: String,
    #[serde(rename = "estimatedExecutionTimeMs", default)]
    pub estimated_execution_time_ms: Option<u64>,
}

/// Provider's settlement view of an executed bridge, keyed by the origin
/// transaction hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderBridgeStatus {
    pub status: String,
    #[serde(rename = "destinationChainId", default, skip_serializing_if = "Option::is_none")]
    pub destination_chain_id: Option<u64>,
    #[serde(
        rename = "destinationTransactionHash",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub destination_transaction_hash: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RoutesEnvelope {
    result: Vec<ProviderRoute>,
}

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    result: ProviderQuote,
}

#[derive(Debug, Deserialize)]
struct PrepareEnvelope {
    result: PrepareResult,
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    result: ProviderBridgeStatus,
}

#[derive(Debug, Deserialize)]
struct PrepareResult {
    steps: Vec<PreparedStep>,
}

impl ThirdwebClient {
    /// Creates a client with the provider credentials as default headers.
    pub fn new(config: &ProviderConfig) -> Result<Self, BridgeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-client-id",
            HeaderValue::from_str(&config.client_id)
                .map_err(|_| BridgeError::ConfigError("invalid THIRDWEB_CLIENT_ID".to_string()))?,
        );
        headers.insert(
            "x-secret-key",
            HeaderValue::from_str(&config.secret_key)
                .map_err(|_| BridgeError::ConfigError("invalid THIRDWEB_SECRET_KEY".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()
            .map_err(|e| BridgeError::ConfigError(e.to_string()))?;

        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    /// Lists available routes between two chains.
    pub async fn get_routes(
        &self,
        origin_chain_id: u64,
        destination_chain_id: u64,
    ) -> Result<Vec<ProviderRoute>, BridgeError> {
        let url = format!("{}/v1/bridge/routes", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("originChainId", origin_chain_id.to_string()),
                ("destinationChainId", destination_chain_id.to_string()),
            ])
            .send()
            .await
            .map_err(|e| BridgeError::NetworkError(format!("routes request failed: {}", e)))?;

        let envelope: RoutesEnvelope = Self::parse_response(response, "routes").await?;
        Ok(envelope.result)
    }

    /// Quotes a bridge swap without preparing transactions.
    pub async fn quote(&self, request: &ProviderSwapRequest) -> Result<ProviderQuote, BridgeError> {
        let url = format!("{}/v1/bridge/buy/quote", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| BridgeError::NetworkError(format!("quote request failed: {}", e)))?;

        let envelope: QuoteEnvelope = Self::parse_response(response, "quote").await?;
        Ok(envelope.result)
    }

    /// Materializes the ordered, unsigned transaction steps for a confirmed
    /// bridge. Step order is the provider's execution order; it is preserved
    /// exactly as returned.
    pub async fn prepare(
        &self,
        request: &ProviderSwapRequest,
    ) -> Result<Vec<PreparedStep>, BridgeError> {
        let url = format!("{}/v1/bridge/buy/prepare", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| BridgeError::NetworkError(format!("prepare request failed: {}", e)))?;

        let envelope: PrepareEnvelope = Self::parse_response(response, "prepare").await?;
        if envelope.result.steps.is_empty() {
            return Err(BridgeError::RouteNotFound(
                "provider returned no transaction steps".to_string(),
            ));
        }
        Ok(envelope.result.steps)
    }

    /// Settlement status of an executed bridge, by origin transaction hash.
    pub async fn status(
        &self,
        tx_hash: &str,
        chain_id: u64,
    ) -> Result<ProviderBridgeStatus, BridgeError> {
        let url = format!("{}/v1/bridge/status", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("transactionHash", tx_hash.to_string()),
                ("chainId", chain_id.to_string()),
            ])
            .send()
            .await
            .map_err(|e| BridgeError::NetworkError(format!("status request failed: {}", e)))?;

        let envelope: StatusEnvelope = Self::parse_response(response, "status").await?;
        Ok(envelope.result)
    }

    /// Maps HTTP failures to error variants with user-facing hints, then
    /// parses the success body. Schema violations are provider errors, not
    /// internal ones: the boundary is where loose shapes get rejected.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        operation: &str,
    ) -> Result<T, BridgeError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, operation, "provider call rejected");
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BridgeError::ProviderAuthError(
                    "bridge provider rejected the configured credentials".to_string(),
                ),
                StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
                    BridgeError::RouteNotFound(format!(
                        "provider found no route for this request: {}",
                        body
                    ))
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    BridgeError::RateLimited("bridge provider rate limit exceeded".to_string())
                }
                _ => BridgeError::ProviderError(format!("{} failed ({}): {}", operation, status, body)),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BridgeError::ProviderError(format!("unexpected {} response: {}", operation, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn test_client(base_url: &str) -> ThirdwebClient {
        let config = ProviderConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
            client_id: "test-client".to_string(),
            secret_key: "test-secret".to_string(),
        };
        ThirdwebClient::new(&config).unwrap()
    }

    fn swap_request() -> ProviderSwapRequest {
        ProviderSwapRequest {
            origin_chain_id: 42161,
            destination_chain_id: 8453,
            origin_token_address: crate::bridge::NATIVE_TOKEN_ADDRESS.to_string(),
            destination_token_address: crate::bridge::NATIVE_TOKEN_ADDRESS.to_string(),
            amount_wei: "10000000000000000".to_string(),
            sender: None,
            receiver: Some("0x742d35Cc6634C0532925a3b8D0b4E4f7E1D4D4f4".to_string()),
        }
    }

    #[tokio::test]
    async fn test_get_routes_sends_credentials() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/bridge/routes")
                .header("x-client-id", "test-client")
                .header("x-secret-key", "test-secret")
                .query_param("originChainId", "42161")
                .query_param("destinationChainId", "8453");
            then.status(200).json_body(serde_json::json!({
                "result": [
                    {"originChainId": 42161, "destinationChainId": 8453}
                ]
            }));
        });

        let client = test_client(&server.base_url());
        let routes = client.get_routes(42161, 8453).await.unwrap();
        mock.assert();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].destination_chain_id, 8453);
    }

    #[tokio::test]
    async fn test_quote_parses_result() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/bridge/buy/quote");
            then.status(200).json_body(serde_json::json!({
                "result": {
                    "originAmount": "10000000000000000",
                    "destinationAmount": "9985000000000000",
                    "estimatedExecutionTimeMs": 45000
                }
            }));
        });

        let client = test_client(&server.base_url());
        let quote = client.quote(&swap_request()).await.unwrap();
        assert_eq!(quote.destination_amount, "9985000000000000");
        assert_eq!(quote.estimated_execution_time_ms, Some(45000));
    }

    #[tokio::test]
    async fn test_prepare_parses_tagged_steps() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/v1/bridge/buy/prepare")
                .json_body_partial(r#"{"amountWei": "10000000000000000"}"#);
            then.status(200).json_body(serde_json::json!({
                "result": {
                    "steps": [
                        {
                            "action": "approval",
                            "transactions": [
                                {"to": "0x01", "data": "0x", "value": "0", "chainId": 42161}
                            ]
                        },
                        {
                            "action": "buy",
                            "transaction":
                                {"to": "0x02", "data": "0xab", "value": "10000000000000000", "chainId": 42161}
                        }
                    ]
                }
            }));
        });

        let client = test_client(&server.base_url());
        let steps = client.prepare(&swap_request()).await.unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].action(), "approval");
        assert_eq!(steps[1].transactions()[0].to, "0x02");
    }

    #[tokio::test]
    async fn test_status_by_origin_hash() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/v1/bridge/status")
                .query_param("transactionHash", "0xabc")
                .query_param("chainId", "42161");
            then.status(200).json_body(serde_json::json!({
                "result": {
                    "status": "COMPLETED",
                    "destinationChainId": 8453,
                    "destinationTransactionHash": "0xdef"
                }
            }));
        });

        let client = test_client(&server.base_url());
        let status = client.status("0xabc", 42161).await.unwrap();
        assert_eq!(status.status, "COMPLETED");
        assert_eq!(status.destination_chain_id, Some(8453));
        assert_eq!(status.destination_transaction_hash.as_deref(), Some("0xdef"));
    }

    #[tokio::test]
    async fn test_auth_failure_maps_to_provider_auth() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/bridge/buy/quote");
            then.status(401).body("invalid credentials");
        });

        let client = test_client(&server.base_url());
        let err = client.quote(&swap_request()).await.unwrap_err();
        assert!(matches!(err, BridgeError::ProviderAuthError(_)));
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_retryable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/bridge/routes");
            then.status(429).body("slow down");
        });

        let client = test_client(&server.base_url());
        let err = client.get_routes(1, 10).await.unwrap_err();
        assert!(matches!(err, BridgeError::RateLimited(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_empty_steps_is_route_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/bridge/buy/prepare");
            then.status(200).json_body(serde_json::json!({"result": {"steps": []}}));
        });

        let client = test_client(&server.base_url());
        let err = client.prepare(&swap_request()).await.unwrap_err();
        assert!(matches!(err, BridgeError::RouteNotFound(_)));
    }

    #[tokio::test]
    async fn test_malformed_step_rejected_at_boundary() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/bridge/buy/prepare");
            then.status(200).json_body(serde_json::json!({
                "result": {"steps": [{"action": "buy", "tx": {}}]}
            }));
        });

        let client = test_client(&server.base_url());
        let err = client.prepare(&swap_request()).await.unwrap_err();
        assert!(matches!(err, BridgeError::ProviderError(_)));
    }
}
