//! Cross-chain bridge domain: request/step types, preparation gateway,
//! provider client, step execution sequencer, and the action store.

pub mod gateway;
pub mod mock;
pub mod provider;
pub mod sequencer;
pub mod store;

use ethers::types::U256;
use serde::{Deserialize, Serialize};

use crate::bridge::sequencer::{StepSequencer, WalletSession};
use crate::bridge::store::{ActionStatus, ActionStore};
use crate::chains;
use crate::core::errors::BridgeError;
use crate::core::units::u256_string;

/// Sentinel address the provider uses for a chain's native gas token.
pub const NATIVE_TOKEN_ADDRESS: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

/// A validated, normalized bridge request. Construction goes through the API
/// validators; both chain ids are guaranteed to resolve in the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeRequest {
    pub from_chain_id: u64,
    pub to_chain_id: u64,
    pub from_token_address: String,
    pub to_token_address: String,
    /// Human-readable decimal amount, e.g. "0.01".
    pub amount: String,
    /// Recipient; the caller's own wallet when absent.
    pub to_address: Option<String>,
}

/// One unsigned transaction produced by the provider.
///
/// `value` is arbitrary precision and crosses the JSON boundary as a decimal
/// string; chainId decides which chain the wallet must be on to submit it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreparedTransaction {
    pub to: String,
    pub data: String,
    #[serde(with = "u256_string")]
    pub value: U256,
    #[serde(rename = "chainId")]
    pub chain_id: u64,
}

/// One logical bridge stage. The provider emits two shapes depending on the
/// route: a single transaction, or a bundle (e.g. approval + call). Parsed as
/// a tagged variant at the boundary instead of duck-typed field checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PreparedStep {
    Single { action: String, transaction: PreparedTransaction },
    Batch { action: String, transactions: Vec<PreparedTransaction> },
}

impl PreparedStep {
    pub fn action(&self) -> &str {
        match self {
            PreparedStep::Single { action, .. } => action,
            PreparedStep::Batch { action, .. } => action,
        }
    }

    /// The step's transactions in execution order.
    pub fn transactions(&self) -> &[PreparedTransaction] {
        match self {
            PreparedStep::Single { transaction, .. } => std::slice::from_ref(transaction),
            PreparedStep::Batch { transactions, .. } => transactions,
        }
    }
}

/// Flattens steps into one ordered transaction list. Execution order is
/// significant and must match the provider's step order exactly.
pub fn flatten_steps(steps: &[PreparedStep]) -> Vec<PreparedTransaction> {
    steps.iter().flat_map(|step| step.transactions().iter().cloned()).collect()
}

/// Builds the user-facing explorer link for a bridge's final transaction,
/// using the origin chain's registry entry.
pub fn result_explorer_url(request: &BridgeRequest, tx_hash: &str) -> Result<String, BridgeError> {
    chains::explorer_tx_url(request.from_chain_id, tx_hash).ok_or_else(|| {
        BridgeError::UnsupportedChain(format!("chain {} not in registry", request.from_chain_id))
    })
}

/// Outcome of a fully executed, recorded bridge action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedAction {
    /// Confirmed hashes in execution order.
    pub tx_hashes: Vec<String>,
    /// The bridge's official result hash (the last one).
    pub final_hash: String,
    /// Explorer link for the final hash on the origin chain.
    pub explorer_url: String,
}

/// Runs a prepared action's steps against a wallet, tracking the record's
/// lifecycle in the store: `Executing` while the sequence runs, `Completed`
/// with the confirmed hashes on success, `Failed` with the error otherwise.
pub async fn execute_action(
    store: &ActionStore,
    sequencer: &StepSequencer,
    wallet: &dyn WalletSession,
    action_id: &str,
) -> Result<CompletedAction, BridgeError> {
    let record = store.get(action_id)?;
    store.update_status(action_id, ActionStatus::Executing)?;

    let result = match sequencer
        .execute(wallet, &record.steps, |phase| {
            tracing::debug!(action_id, ?phase, "sequence progress");
        })
        .await
    {
        Ok(result) => result,
        Err(err) => {
            store.update_status(action_id, ActionStatus::Failed { error: err.to_string() })?;
            return Err(err);
        }
    };

    let final_hash = result
        .final_hash()
        .map(str::to_string)
        .ok_or_else(|| BridgeError::InternalError("sequence produced no hashes".to_string()))?;
    let explorer_url = result_explorer_url(&record.request, &final_hash)?;
    store.update_status(
        action_id,
        ActionStatus::Completed { tx_hashes: result.tx_hashes.clone() },
    )?;
    tracing::info!(action_id, %final_hash, "bridge action completed");

    Ok(CompletedAction { tx_hashes: result.tx_hashes, final_hash, explorer_url })
}
