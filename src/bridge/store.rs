//! In-memory store for prepared bridge actions.
//!
//! Every prepared bridge gets a record keyed by a fresh UUID; the id doubles
//! as the transaction id surfaced to API clients. Records expire after a TTL
//! and are evicted lazily on access and insert. The store is injected where
//! needed, never reached through a global.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::bridge::{BridgeRequest, PreparedStep};
use crate::core::config::ActionStoreConfig;
use crate::core::errors::BridgeError;

/// Lifecycle of a prepared bridge action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ActionStatus {
    /// Steps prepared, nothing submitted.
    Prepared,
    /// Sequence execution in progress.
    Executing,
    /// All transactions confirmed.
    Completed { tx_hashes: Vec<String> },
    /// Sequence aborted; partial hashes are not retained.
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: String,
    pub request: BridgeRequest,
    pub steps: Vec<PreparedStep>,
    pub status: ActionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct ActionStore {
    records: Mutex<HashMap<String, ActionRecord>>,
    ttl: Duration,
}

impl ActionStore {
    pub fn new(config: &ActionStoreConfig) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            ttl: Duration::seconds(config.ttl_seconds as i64),
        }
    }

    /// Stores a freshly prepared action and returns its minted id.
    pub fn insert(&self, request: BridgeRequest, steps: Vec<PreparedStep>) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let record = ActionRecord {
            id: id.clone(),
            request,
            steps,
            status: ActionStatus::Prepared,
            created_at: now,
            updated_at: now,
        };
        let mut records = self.records.lock();
        Self::evict_expired(&mut records, self.ttl);
        records.insert(id.clone(), record);
        id
    }

    /// Fetches a live record. Expired or unknown ids are both not-found: the
    /// caller cannot distinguish them and should not.
    pub fn get(&self, id: &str) -> Result<ActionRecord, BridgeError> {
        let mut records = self.records.lock();
        Self::evict_expired(&mut records, self.ttl);
        records
            .get(id)
            .cloned()
            .ok_or_else(|| BridgeError::NotFoundError(format!("no bridge action with id {}", id)))
    }

    /// Transitions a record's status. Terminal states stick: a completed or
    /// failed action cannot move again.
    pub fn update_status(&self, id: &str, status: ActionStatus) -> Result<(), BridgeError> {
        let mut records = self.records.lock();
        Self::evict_expired(&mut records, self.ttl);
        let record = records
            .get_mut(id)
            .ok_or_else(|| BridgeError::NotFoundError(format!("no bridge action with id {}", id)))?;
        match record.status {
            ActionStatus::Completed { .. } | ActionStatus::Failed { .. } => {
                return Err(BridgeError::InternalError(format!(
                    "action {} already finished",
                    id
                )));
            }
            _ => {
                record.status = status;
                record.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    fn evict_expired(records: &mut HashMap<String, ActionRecord>, ttl: Duration) {
        let cutoff = Utc::now() - ttl;
        records.retain(|_, record| record.created_at > cutoff);
    }
}
