//! Bridge preparation gateway.
//!
//! Sits between the HTTP handlers and the provider client: converts validated
//! requests into provider calls, mints action records for prepared bridges,
//! and builds the confirmation links handed back to unconfirmed callers.

use std::sync::Arc;

use crate::bridge::provider::{
    ProviderBridgeStatus, ProviderQuote, ProviderSwapRequest, ThirdwebClient,
};
use crate::bridge::store::ActionStore;
use crate::bridge::{flatten_steps, BridgeRequest, PreparedStep, PreparedTransaction};
use crate::chains;
use crate::core::errors::BridgeError;
use crate::core::units::to_base_units;

/// Token amounts are interpreted at the native 18-decimal scale. Per-token
/// decimal metadata would need a token registry the provider does not expose.
const TOKEN_DECIMALS: u32 = 18;

/// A confirmed bridge, ready for a wallet to execute.
#[derive(Debug, Clone)]
pub struct PreparedBridge {
    /// Action store id, surfaced to clients as the transaction id.
    pub transaction_id: String,
    /// Provider steps in execution order.
    pub steps: Vec<PreparedStep>,
    /// The same steps flattened to one ordered transaction list.
    pub transactions: Vec<PreparedTransaction>,
}

pub struct BridgeGateway {
    provider: ThirdwebClient,
    store: Arc<ActionStore>,
    public_base_url: String,
}

impl BridgeGateway {
    pub fn new(provider: ThirdwebClient, store: Arc<ActionStore>, public_base_url: String) -> Self {
        Self { provider, store, public_base_url: public_base_url.trim_end_matches('/').to_string() }
    }

    pub fn store(&self) -> &Arc<ActionStore> {
        &self.store
    }

    /// Quotes an unconfirmed request. Fails with `RouteNotFound` when the
    /// provider lists no route between the two chains, so callers get a
    /// terminal answer before being handed a confirmation link.
    pub async fn quote(&self, request: &BridgeRequest) -> Result<ProviderQuote, BridgeError> {
        self.ensure_supported_chains(request)?;

        let routes = self
            .provider
            .get_routes(request.from_chain_id, request.to_chain_id)
            .await?;
        if routes.is_empty() {
            return Err(BridgeError::RouteNotFound(format!(
                "no route from chain {} to chain {}",
                request.from_chain_id, request.to_chain_id
            )));
        }

        self.provider.quote(&self.swap_request(request)?).await
    }

    /// Prepares a confirmed bridge: fetches the provider's transaction steps
    /// and records the action. Nothing is submitted on-chain here; execution
    /// belongs to the caller's wallet.
    pub async fn prepare(&self, request: &BridgeRequest) -> Result<PreparedBridge, BridgeError> {
        self.ensure_supported_chains(request)?;

        let steps = self.provider.prepare(&self.swap_request(request)?).await?;
        let transactions = flatten_steps(&steps);
        let transaction_id = self.store.insert(request.clone(), steps.clone());
        tracing::info!(
            transaction_id = %transaction_id,
            from_chain = request.from_chain_id,
            to_chain = request.to_chain_id,
            steps = steps.len(),
            transactions = transactions.len(),
            "bridge prepared"
        );

        Ok(PreparedBridge { transaction_id, steps, transactions })
    }

    /// Provider-side settlement status for an executed bridge transaction.
    pub async fn bridge_status(
        &self,
        tx_hash: &str,
        chain_id: u64,
    ) -> Result<ProviderBridgeStatus, BridgeError> {
        self.provider.status(tx_hash, chain_id).await
    }

    /// Builds the confirmation URL for an unconfirmed request. `toAddress` is
    /// always present in the query, empty when the caller omitted it.
    pub fn confirmation_url(&self, request: &BridgeRequest) -> Result<String, BridgeError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/bridge/confirm", self.public_base_url),
            &[
                ("fromChainId", request.from_chain_id.to_string()),
                ("toChainId", request.to_chain_id.to_string()),
                ("fromTokenAddress", request.from_token_address.clone()),
                ("toTokenAddress", request.to_token_address.clone()),
                ("amount", request.amount.clone()),
                ("toAddress", request.to_address.clone().unwrap_or_default()),
            ],
        )
        .map_err(|e| BridgeError::InternalError(format!("confirmation url: {}", e)))?;
        Ok(url.to_string())
    }

    fn ensure_supported_chains(&self, request: &BridgeRequest) -> Result<(), BridgeError> {
        for chain_id in [request.from_chain_id, request.to_chain_id] {
            if chains::lookup(chain_id).is_none() {
                return Err(BridgeError::UnsupportedChain(chain_id.to_string()));
            }
        }
        Ok(())
    }

    fn swap_request(&self, request: &BridgeRequest) -> Result<ProviderSwapRequest, BridgeError> {
        let amount_wei = to_base_units(&request.amount, TOKEN_DECIMALS)?;
        Ok(ProviderSwapRequest {
            origin_chain_id: request.from_chain_id,
            destination_chain_id: request.to_chain_id,
            origin_token_address: request.from_token_address.clone(),
            destination_token_address: request.to_token_address.clone(),
            amount_wei: amount_wei.to_string(),
            sender: request.to_address.clone(),
            receiver: request.to_address.clone(),
        })
    }
}
