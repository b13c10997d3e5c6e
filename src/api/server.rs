use axum::error_handling::HandleErrorLayer;
use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::{limit::ConcurrencyLimitLayer, timeout::TimeoutLayer, BoxError, ServiceBuilder};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::api::handlers;
use crate::api::server_config::*;
use crate::bridge::gateway::BridgeGateway;
use crate::bridge::provider::ThirdwebClient;
use crate::bridge::sequencer::StepSequencer;
use crate::bridge::store::ActionStore;
use crate::core::config::GatewayConfig;
use crate::core::errors::BridgeError;

/// Shared state for the HTTP surface: one gateway, one action store, and the
/// sequencer embedders use with `bridge::execute_action` to drive a wallet
/// through prepared steps.
pub struct GatewayServer {
    pub gateway: BridgeGateway,
    pub store: Arc<ActionStore>,
    pub sequencer: StepSequencer,
    pub config: GatewayConfig,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig) -> Result<Self, BridgeError> {
        let provider = ThirdwebClient::new(&config.provider)?;
        let store = Arc::new(ActionStore::new(&config.actions));
        let sequencer = StepSequencer::new(config.sequencer.clone());
        let gateway =
            BridgeGateway::new(provider, store.clone(), config.server.public_base_url.clone());
        Ok(Self { gateway, store, sequencer, config })
    }

    pub fn create_router(self) -> Result<Router, BridgeError> {
        let cors = cors_layer(&self.config.server.cors_allow_origin)?;
        let state = Arc::new(self);

        let router = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/api/health", get(handlers::health_check))
            .route("/mcp", get(handlers::mcp_server_info))
            .route("/api/mcp/bridge-asset", post(handlers::bridge_asset))
            .route("/api/bridge/action/:id", get(handlers::bridge_action_status))
            .route("/bridge/confirm", get(handlers::confirm_page))
            .with_state(state)
            .layer(cors)
            .layer(
                ServiceBuilder::new()
                    // convert middleware errors (timeout/overload) into responses
                    .layer(HandleErrorLayer::new(|err: BoxError| async move {
                        if err.is::<tower::timeout::error::Elapsed>() {
                            (StatusCode::REQUEST_TIMEOUT, "request timed out")
                        } else {
                            (StatusCode::SERVICE_UNAVAILABLE, "service overloaded")
                        }
                    }))
                    .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENCY))
                    .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
                    .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                    .layer(TraceLayer::new_for_http()),
            );

        Ok(router)
    }

    pub async fn start(self) -> Result<(), anyhow::Error> {
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let router = self.create_router()?;
        tracing::info!("Server listening on {}", addr);
        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router.into_make_service()).await?;
        Ok(())
    }
}

/// `*` allows any origin; a comma-separated list allows each entry exactly.
fn cors_layer(allow_origin: &str) -> Result<CorsLayer, BridgeError> {
    let origin = if allow_origin == "*" {
        AllowOrigin::any()
    } else if allow_origin.contains(',') {
        let list = allow_origin
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                axum::http::HeaderValue::from_str(s)
                    .map_err(|_| BridgeError::ConfigError(format!("invalid CORS origin: {}", s)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(list)
    } else {
        AllowOrigin::exact(axum::http::HeaderValue::from_str(allow_origin).map_err(|_| {
            BridgeError::ConfigError(format!("invalid CORS origin: {}", allow_origin))
        })?)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST, axum::http::Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT])
        .max_age(CORS_MAX_AGE))
}
