//! Ordered step execution against a wallet session.
//!
//! The sequencer walks prepared transactions in provider order, switching the
//! wallet's active chain only when a transaction targets a different chain
//! than the previous one. Every wait is a state poll with exponential backoff
//! and a hard timeout; any failure aborts the remainder of the sequence and
//! discards partial progress.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

use crate::bridge::{flatten_steps, PreparedStep, PreparedTransaction};
use crate::core::config::SequencerConfig;
use crate::core::errors::BridgeError;

/// Terminal state of a submitted transaction as seen by the wallet's chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    /// Not yet mined.
    Pending,
    /// Mined and succeeded.
    Confirmed,
    /// Mined and reverted.
    Failed,
}

/// Progress notifications emitted while a sequence runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencePhase {
    SwitchingChain { chain_id: u64 },
    Submitting { index: usize, total: usize, chain_id: u64 },
    AwaitingReceipt { tx_hash: String },
    Confirmed { tx_hash: String },
}

/// The wallet surface the sequencer drives. Submission is fire-and-return:
/// the hash comes back immediately and confirmation is polled separately.
#[async_trait]
pub trait WalletSession: Send + Sync {
    /// Chain the wallet is currently connected to.
    async fn active_chain_id(&self) -> Result<u64, BridgeError>;

    /// Ask the wallet to move to the given chain. Completion is verified by
    /// polling `active_chain_id`, not by this call returning.
    async fn request_chain_switch(&self, chain_id: u64) -> Result<(), BridgeError>;

    /// Sign and broadcast, returning the transaction hash.
    async fn send_transaction(&self, tx: &PreparedTransaction) -> Result<String, BridgeError>;

    /// Receipt lookup on the wallet's active chain.
    async fn transaction_receipt(&self, tx_hash: &str) -> Result<ReceiptStatus, BridgeError>;
}

/// Outcome of a fully confirmed sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceResult {
    /// Confirmed hashes, one per transaction, in execution order.
    pub tx_hashes: Vec<String>,
    /// Number of chain switches performed.
    pub chain_switches: usize,
}

impl SequenceResult {
    /// The bridge's official result: the last confirmed hash.
    pub fn final_hash(&self) -> Option<&str> {
        self.tx_hashes.last().map(String::as_str)
    }
}

pub struct StepSequencer {
    config: SequencerConfig,
}

impl StepSequencer {
    pub fn new(config: SequencerConfig) -> Self {
        Self { config }
    }

    /// Executes every transaction of every step, in order, against `wallet`.
    ///
    /// A chain switch happens once per chain transition, not once per
    /// transaction. Each transaction must confirm before the next is
    /// submitted. On any error the sequence aborts and no partial hash list
    /// is returned.
    pub async fn execute(
        &self,
        wallet: &dyn WalletSession,
        steps: &[PreparedStep],
        mut progress: impl FnMut(SequencePhase) + Send,
    ) -> Result<SequenceResult, BridgeError> {
        let transactions = flatten_steps(steps);
        if transactions.is_empty() {
            return Err(BridgeError::ValidationError(
                "sequence contains no transactions".to_string(),
            ));
        }

        let total = transactions.len();
        let mut current_chain = wallet.active_chain_id().await?;
        let mut tx_hashes = Vec::with_capacity(total);
        let mut chain_switches = 0usize;

        for (index, tx) in transactions.iter().enumerate() {
            if tx.chain_id != current_chain {
                progress(SequencePhase::SwitchingChain { chain_id: tx.chain_id });
                self.switch_chain(wallet, tx.chain_id).await?;
                current_chain = tx.chain_id;
                chain_switches += 1;
            }

            progress(SequencePhase::Submitting { index, total, chain_id: tx.chain_id });
            let tx_hash = wallet.send_transaction(tx).await?;
            tracing::info!(%tx_hash, chain_id = tx.chain_id, index, total, "transaction submitted");

            progress(SequencePhase::AwaitingReceipt { tx_hash: tx_hash.clone() });
            self.await_receipt(wallet, &tx_hash).await?;
            progress(SequencePhase::Confirmed { tx_hash: tx_hash.clone() });
            tx_hashes.push(tx_hash);
        }

        Ok(SequenceResult { tx_hashes, chain_switches })
    }

    /// Requests the switch, then polls the wallet's reported chain until it
    /// matches or the switch timeout elapses.
    async fn switch_chain(
        &self,
        wallet: &dyn WalletSession,
        chain_id: u64,
    ) -> Result<(), BridgeError> {
        wallet.request_chain_switch(chain_id).await?;

        let deadline = Instant::now() + Duration::from_millis(self.config.switch_timeout_ms);
        let mut interval = Duration::from_millis(self.config.poll_initial_ms);
        loop {
            if wallet.active_chain_id().await? == chain_id {
                tracing::debug!(chain_id, "wallet reached target chain");
                return Ok(());
            }
            if Instant::now() + interval > deadline {
                return Err(BridgeError::ChainSwitchError(format!(
                    "wallet did not reach chain {} within {}ms",
                    chain_id, self.config.switch_timeout_ms
                )));
            }
            tokio::time::sleep(interval).await;
            interval = self.next_interval(interval);
        }
    }

    /// Polls until the receipt is terminal or the receipt timeout elapses.
    /// A failed receipt is a hard error, never retried.
    async fn await_receipt(
        &self,
        wallet: &dyn WalletSession,
        tx_hash: &str,
    ) -> Result<(), BridgeError> {
        let deadline = Instant::now() + Duration::from_millis(self.config.receipt_timeout_ms);
        let mut interval = Duration::from_millis(self.config.poll_initial_ms);
        loop {
            match wallet.transaction_receipt(tx_hash).await? {
                ReceiptStatus::Confirmed => return Ok(()),
                ReceiptStatus::Failed => {
                    return Err(BridgeError::TransactionFailed(format!(
                        "transaction {} reverted",
                        tx_hash
                    )));
                }
                ReceiptStatus::Pending => {}
            }
            if Instant::now() + interval > deadline {
                return Err(BridgeError::TimeoutError(format!(
                    "no receipt for {} within {}ms",
                    tx_hash, self.config.receipt_timeout_ms
                )));
            }
            tokio::time::sleep(interval).await;
            interval = self.next_interval(interval);
        }
    }

    fn next_interval(&self, current: Duration) -> Duration {
        let doubled = current.saturating_mul(2);
        doubled.min(Duration::from_millis(self.config.poll_max_ms))
    }
}
