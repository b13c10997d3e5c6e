//! End-to-end tests for the HTTP surface, with the provider mocked.

use axum_test::TestServer;
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

use nullbridge::api::server::GatewayServer;
use nullbridge::bridge::store::{ActionStatus, ActionStore};
use nullbridge::bridge::{BridgeRequest, NATIVE_TOKEN_ADDRESS};
use nullbridge::core::config::GatewayConfig;

const RECIPIENT: &str = "0x742d35Cc6634C0532925a3b8D0b4E4f7E1D4D4f4";

fn test_server_with_store(provider_url: &str) -> (TestServer, Arc<ActionStore>) {
    let mut config = GatewayConfig::default();
    config.provider.base_url = provider_url.to_string();
    config.provider.client_id = "test-client".to_string();
    config.provider.secret_key = "test-secret".to_string();
    config.server.public_base_url = "http://localhost:8888".to_string();

    let server = GatewayServer::new(config).unwrap();
    let store = server.store.clone();
    (TestServer::new(server.create_router().unwrap()).unwrap(), store)
}

fn test_server(provider_url: &str) -> TestServer {
    test_server_with_store(provider_url).0
}

fn bridge_payload(confirmed: bool) -> Value {
    json!({
        "fromChainId": 42161,
        "toChainId": 8453,
        "fromTokenAddress": NATIVE_TOKEN_ADDRESS,
        "toTokenAddress": NATIVE_TOKEN_ADDRESS,
        "amount": "0.01",
        "toAddress": RECIPIENT,
        "confirmed": confirmed
    })
}

fn mock_prepare(provider: &MockServer) -> httpmock::Mock<'_> {
    provider.mock(|when, then| {
        when.method(POST)
            .path("/v1/bridge/buy/prepare")
            .header("x-client-id", "test-client")
            .header("x-secret-key", "test-secret")
            .json_body_partial(r#"{"amountWei": "10000000000000000"}"#);
        then.status(200).json_body(json!({
            "result": {
                "steps": [
                    {
                        "action": "approval",
                        "transactions": [
                            {"to": "0x1111111111111111111111111111111111111111",
                             "data": "0x095ea7b3", "value": "0", "chainId": 42161}
                        ]
                    },
                    {
                        "action": "buy",
                        "transaction":
                            {"to": "0x2222222222222222222222222222222222222222",
                             "data": "0xdeadbeef", "value": "10000000000000000", "chainId": 42161}
                    }
                ]
            }
        }));
    })
}

#[tokio::test]
async fn test_health_endpoints() {
    let provider = MockServer::start();
    let server = test_server(&provider.base_url());

    for path in ["/health", "/api/health"] {
        let response = server.get(path).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
    }
}

#[tokio::test]
async fn test_mcp_server_info() {
    let provider = MockServer::start();
    let server = test_server(&provider.base_url());

    let response = server.get("/mcp").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["tools"][0]["name"], "bridge-asset");
    assert!(body["supportedChains"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["id"] == 42161));
}

#[tokio::test]
async fn test_missing_parameters_enumerated() {
    let provider = MockServer::start();
    let guard = provider.mock(|when, then| {
        when.path_contains("/v1/bridge");
        then.status(500);
    });
    let server = test_server(&provider.base_url());

    let response = server
        .post("/api/mcp/bridge-asset")
        .json(&json!({"fromChainId": 42161, "amount": "0.01"}))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "Missing required parameters");
    assert_eq!(body["missing"], json!(["toChainId", "fromTokenAddress", "toTokenAddress"]));
    guard.assert_hits(0);
}

#[tokio::test]
async fn test_unsupported_chain_rejected_before_provider() {
    let provider = MockServer::start();
    let guard = provider.mock(|when, then| {
        when.path_contains("/v1/bridge");
        then.status(500);
    });
    let server = test_server(&provider.base_url());

    let mut payload = bridge_payload(true);
    payload["toChainId"] = json!(999999);
    let response = server.post("/api/mcp/bridge-asset").json(&payload).await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"], "Unsupported chain ID provided.");
    assert_eq!(body["code"], "UNSUPPORTED_CHAIN");
    guard.assert_hits(0);
}

#[tokio::test]
async fn test_unconfirmed_returns_confirmation_url() {
    let provider = MockServer::start();
    provider.mock(|when, then| {
        when.method(GET).path("/v1/bridge/routes");
        then.status(200).json_body(json!({
            "result": [{"originChainId": 42161, "destinationChainId": 8453}]
        }));
    });
    provider.mock(|when, then| {
        when.method(POST)
            .path("/v1/bridge/buy/quote")
            .json_body_partial(r#"{"amountWei": "10000000000000000"}"#);
        then.status(200).json_body(json!({
            "result": {
                "originAmount": "10000000000000000",
                "destinationAmount": "9985000000000000"
            }
        }));
    });
    let server = test_server(&provider.base_url());

    let response = server.post("/api/mcp/bridge-asset").json(&bridge_payload(false)).await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["status"], "pending_confirmation");
    let url = body["confirmationUrl"].as_str().unwrap();
    assert!(url.starts_with("http://localhost:8888/bridge/confirm?"));
    assert!(url.contains("fromChainId=42161"));
    assert!(url.contains("toChainId=8453"));
    assert!(url.contains("amount=0.01"));
    assert!(url.contains(&format!("toAddress={}", RECIPIENT)));
    assert_eq!(body["estimate"]["destinationAmount"], "9985000000000000");
}

#[tokio::test]
async fn test_unconfirmed_without_recipient_has_empty_to_address() {
    let provider = MockServer::start();
    provider.mock(|when, then| {
        when.method(GET).path("/v1/bridge/routes");
        then.status(200).json_body(json!({
            "result": [{"originChainId": 42161, "destinationChainId": 8453}]
        }));
    });
    provider.mock(|when, then| {
        when.method(POST).path("/v1/bridge/buy/quote");
        then.status(200).json_body(json!({
            "result": {"originAmount": "1", "destinationAmount": "1"}
        }));
    });
    let server = test_server(&provider.base_url());

    let mut payload = bridge_payload(false);
    payload.as_object_mut().unwrap().remove("toAddress");
    let response = server.post("/api/mcp/bridge-asset").json(&payload).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["confirmationUrl"].as_str().unwrap().ends_with("&toAddress="));
}

#[tokio::test]
async fn test_no_route_is_terminal() {
    let provider = MockServer::start();
    provider.mock(|when, then| {
        when.method(GET).path("/v1/bridge/routes");
        then.status(200).json_body(json!({"result": []}));
    });
    let server = test_server(&provider.base_url());

    let response = server.post("/api/mcp/bridge-asset").json(&bridge_payload(false)).await;
    response.assert_status_internal_server_error();
    let body: Value = response.json();
    assert_eq!(body["status"], "failed");
    assert_eq!(body["code"], "ROUTE_NOT_FOUND");
}

#[tokio::test]
async fn test_confirmed_returns_steps_and_action_record() {
    let provider = MockServer::start();
    let prepare = mock_prepare(&provider);
    let server = test_server(&provider.base_url());

    let response = server.post("/api/mcp/bridge-asset").json(&bridge_payload(true)).await;
    response.assert_status_ok();
    let body: Value = response.json();
    prepare.assert();

    assert_eq!(body["status"], "success");
    assert_eq!(body["steps"].as_array().unwrap().len(), 2);
    // flattened in provider order, values as decimal strings
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0]["to"], "0x1111111111111111111111111111111111111111");
    assert_eq!(transactions[1]["value"], "10000000000000000");

    // the minted id is immediately queryable
    let id = body["transactionId"].as_str().unwrap();
    let record = server.get(&format!("/api/bridge/action/{}", id)).await;
    record.assert_status_ok();
    let record: Value = record.json();
    assert_eq!(record["id"], id);
    assert_eq!(record["status"]["state"], "prepared");
    assert_eq!(record["request"]["amount"], "0.01");
}

fn completed_record(store: &Arc<ActionStore>, final_hash: &str) -> String {
    let request = BridgeRequest {
        from_chain_id: 42161,
        to_chain_id: 8453,
        from_token_address: NATIVE_TOKEN_ADDRESS.to_string(),
        to_token_address: NATIVE_TOKEN_ADDRESS.to_string(),
        amount: "0.01".to_string(),
        to_address: None,
    };
    let id = store.insert(request, vec![]);
    store.update_status(&id, ActionStatus::Executing).unwrap();
    store
        .update_status(&id, ActionStatus::Completed { tx_hashes: vec![final_hash.to_string()] })
        .unwrap();
    id
}

#[tokio::test]
async fn test_completed_action_includes_provider_status() {
    let provider = MockServer::start();
    let status_mock = provider.mock(|when, then| {
        when.method(GET)
            .path("/v1/bridge/status")
            .query_param("transactionHash", "0xfinal")
            .query_param("chainId", "42161");
        then.status(200).json_body(json!({
            "result": {"status": "COMPLETED", "destinationChainId": 8453}
        }));
    });
    let (server, store) = test_server_with_store(&provider.base_url());

    let id = completed_record(&store, "0xfinal");
    let response = server.get(&format!("/api/bridge/action/{}", id)).await;

    response.assert_status_ok();
    status_mock.assert();
    let body: Value = response.json();
    assert_eq!(body["status"]["state"], "completed");
    assert_eq!(body["status"]["tx_hashes"], json!(["0xfinal"]));
    assert_eq!(body["providerStatus"]["status"], "COMPLETED");
    assert_eq!(body["providerStatus"]["destinationChainId"], 8453);
}

#[tokio::test]
async fn test_action_record_survives_provider_status_outage() {
    let provider = MockServer::start();
    provider.mock(|when, then| {
        when.method(GET).path("/v1/bridge/status");
        then.status(500).body("provider down");
    });
    let (server, store) = test_server_with_store(&provider.base_url());

    let id = completed_record(&store, "0xfinal");
    let response = server.get(&format!("/api/bridge/action/{}", id)).await;

    // local record is still served; the provider view is simply absent
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"]["state"], "completed");
    assert!(body.get("providerStatus").is_none());
}

#[tokio::test]
async fn test_unknown_action_id_not_found() {
    let provider = MockServer::start();
    let server = test_server(&provider.base_url());

    let response = server.get("/api/bridge/action/does-not-exist").await;
    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_provider_failure_surfaces_as_failed() {
    let provider = MockServer::start();
    provider.mock(|when, then| {
        when.method(POST).path("/v1/bridge/buy/prepare");
        then.status(500).body("provider exploded");
    });
    let server = test_server(&provider.base_url());

    let response = server.post("/api/mcp/bridge-asset").json(&bridge_payload(true)).await;
    response.assert_status_internal_server_error();
    let body: Value = response.json();
    assert_eq!(body["status"], "failed");
    assert_eq!(body["code"], "PROVIDER_ERROR");
}

#[tokio::test]
async fn test_provider_auth_failure() {
    let provider = MockServer::start();
    provider.mock(|when, then| {
        when.method(POST).path("/v1/bridge/buy/prepare");
        then.status(401).body("bad key");
    });
    let server = test_server(&provider.base_url());

    let response = server.post("/api/mcp/bridge-asset").json(&bridge_payload(true)).await;
    response.assert_status_internal_server_error();
    let body: Value = response.json();
    assert_eq!(body["code"], "PROVIDER_AUTH_FAILED");
}

#[tokio::test]
async fn test_confirm_page_renders_request() {
    let provider = MockServer::start();
    let server = test_server(&provider.base_url());

    let response = server
        .get("/bridge/confirm")
        .add_query_param("fromChainId", "42161")
        .add_query_param("toChainId", "8453")
        .add_query_param("fromTokenAddress", NATIVE_TOKEN_ADDRESS)
        .add_query_param("toTokenAddress", NATIVE_TOKEN_ADDRESS)
        .add_query_param("amount", "0.01")
        .add_query_param("toAddress", RECIPIENT)
        .await;

    response.assert_status_ok();
    let page = response.text();
    assert!(page.contains("Arbitrum One"));
    assert!(page.contains("Base Mainnet"));
    assert!(page.contains("0.01"));
    assert!(page.contains(RECIPIENT));
}

#[tokio::test]
async fn test_confirm_page_rejects_bad_params() {
    let provider = MockServer::start();
    let server = test_server(&provider.base_url());

    let response = server
        .get("/bridge/confirm")
        .add_query_param("fromChainId", "999999")
        .add_query_param("toChainId", "8453")
        .add_query_param("fromTokenAddress", NATIVE_TOKEN_ADDRESS)
        .add_query_param("toTokenAddress", NATIVE_TOKEN_ADDRESS)
        .add_query_param("amount", "0.01")
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_invalid_amount_rejected() {
    let provider = MockServer::start();
    let guard = provider.mock(|when, then| {
        when.path_contains("/v1/bridge");
        then.status(500);
    });
    let server = test_server(&provider.base_url());

    let mut payload = bridge_payload(true);
    payload["amount"] = json!("0.1e5");
    let response = server.post("/api/mcp/bridge-asset").json(&payload).await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid amount");
    guard.assert_hits(0);
}
