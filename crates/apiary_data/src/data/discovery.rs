use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Identity of a player in the discovery ledger.
pub type PlayerId = Uuid;

/// Who discovered a species first, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discoverer {
    pub id: PlayerId,
    pub name: String,
    pub discovered_at: DateTime<Utc>,
}

impl Discoverer {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            discovered_at: Utc::now(),
        }
    }
}

/// Serializable copy of the whole ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Species uids each player has discovered.
    pub players: BTreeMap<PlayerId, BTreeSet<String>>,
    /// Species uid to first discoverer.
    pub first_discoverers: BTreeMap<String, Discoverer>,
}
