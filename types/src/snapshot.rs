use serde::{Deserialize, Serialize};

use crate::Round;

/// Persisted session state.
///
/// This is the shape an external collaborator saves and restores; the core
/// never touches a persistence mechanism itself. The raw server seed is
/// present here because the snapshot lives on the server side of the trust
/// boundary; it must never cross to the player until revealed by rotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub balance: u64,
    pub bet_amount: u64,
    pub server_seed: String,
    pub client_seed: String,
    pub nonce: u64,
    /// Most-recent rounds, newest first, at most [crate::HISTORY_CAPACITY]
    pub previous_rolls: Vec<Round>,
    /// Result hash of the latest resolved round, empty before the first
    pub last_hash: String,
}
