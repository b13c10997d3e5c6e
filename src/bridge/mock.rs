//! In-process wallet session for tests and local development.
//!
//! Switches chains and confirms receipts instantly unless told otherwise;
//! the failure knobs exist so sequencer behavior under misbehaving wallets
//! can be exercised without a real signer.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::bridge::sequencer::{ReceiptStatus, WalletSession};
use crate::bridge::PreparedTransaction;
use crate::core::errors::BridgeError;

#[derive(Default)]
struct MockWalletState {
    active_chain: u64,
    sent: Vec<String>,
    switch_requests: Vec<u64>,
    receipt_polls: u32,
    pending_polls_remaining: u32,
    failed_targets: Vec<String>,
    refuse_switches: bool,
    reject_next_send: Option<String>,
}

pub struct MockWallet {
    state: Mutex<MockWalletState>,
}

impl MockWallet {
    pub fn new(initial_chain: u64) -> Self {
        Self {
            state: Mutex::new(MockWalletState { active_chain: initial_chain, ..Default::default() }),
        }
    }

    /// Transactions submitted so far, identified by their `to` address.
    pub fn sent_transactions(&self) -> Vec<String> {
        self.state.lock().sent.clone()
    }

    /// Chain ids the sequencer asked to switch to, in order.
    pub fn switch_requests(&self) -> Vec<u64> {
        self.state.lock().switch_requests.clone()
    }

    pub fn receipt_polls(&self) -> u32 {
        self.state.lock().receipt_polls
    }

    /// Makes any transaction sent to `to` produce a reverted receipt.
    pub fn fail_transaction_to(&self, to: &str) {
        self.state.lock().failed_targets.push(to.to_string());
    }

    /// The next `count` receipt polls report pending before confirming.
    pub fn set_pending_polls(&self, count: u32) {
        self.state.lock().pending_polls_remaining = count;
    }

    /// Acknowledge switch requests but never change the active chain.
    pub fn refuse_chain_switches(&self) {
        self.state.lock().refuse_switches = true;
    }

    /// The next send fails as a wallet rejection with the given reason.
    pub fn reject_next_send(&self, reason: &str) {
        self.state.lock().reject_next_send = Some(reason.to_string());
    }
}

#[async_trait]
impl WalletSession for MockWallet {
    async fn active_chain_id(&self) -> Result<u64, BridgeError> {
        Ok(self.state.lock().active_chain)
    }

    async fn request_chain_switch(&self, chain_id: u64) -> Result<(), BridgeError> {
        let mut state = self.state.lock();
        state.switch_requests.push(chain_id);
        if !state.refuse_switches {
            state.active_chain = chain_id;
        }
        Ok(())
    }

    async fn send_transaction(&self, tx: &PreparedTransaction) -> Result<String, BridgeError> {
        let mut state = self.state.lock();
        if let Some(reason) = state.reject_next_send.take() {
            return Err(BridgeError::WalletError(reason));
        }
        if tx.chain_id != state.active_chain {
            return Err(BridgeError::WalletError(format!(
                "transaction targets chain {} but wallet is on {}",
                tx.chain_id, state.active_chain
            )));
        }
        // hash doubles as the `to` address so tests can correlate
        state.sent.push(tx.to.clone());
        Ok(tx.to.clone())
    }

    async fn transaction_receipt(&self, tx_hash: &str) -> Result<ReceiptStatus, BridgeError> {
        let mut state = self.state.lock();
        state.receipt_polls += 1;
        if state.pending_polls_remaining > 0 {
            state.pending_polls_remaining -= 1;
            return Ok(ReceiptStatus::Pending);
        }
        if state.failed_targets.iter().any(|t| t == tx_hash) {
            return Ok(ReceiptStatus::Failed);
        }
        Ok(ReceiptStatus::Confirmed)
    }
}
