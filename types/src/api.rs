//! Request and response payloads for the simulator API.
//!
//! Every payload is JSON. The raw server seed is withheld from every
//! response until it is revealed by seed rotation: [RoundView] redacts the
//! seed for rounds that belong to the still-active commitment, and session
//! views expose the commitment only.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Round, VerificationReport};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionRequest {
    /// Starting balance; defaults to [crate::INITIAL_BALANCE]
    pub initial_balance: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BetRequest {
    pub amount: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientSeedRequest {
    pub seed: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResetRequest {
    /// Balance to reset to; defaults to the session's initial stake
    pub amount: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub round: Round,
    /// Commitment published before the round's seed was used, if retained
    pub commitment: Option<String>,
}

/// A round as shown to the player.
///
/// `server_seed` is `None` while the seed that produced the round is still
/// active; it is populated once rotation reveals the seed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundView {
    #[serde(rename = "diceValue")]
    pub face: u8,
    #[serde(rename = "betAmount")]
    pub bet: u64,
    pub won: bool,
    #[serde(rename = "serverSeed", skip_serializing_if = "Option::is_none")]
    pub server_seed: Option<String>,
    #[serde(rename = "clientSeed")]
    pub client_seed: String,
    pub nonce: u64,
    #[serde(rename = "hash")]
    pub result_hash: String,
}

impl RoundView {
    /// Build a view of `round`, withholding the server seed if it is the
    /// session's still-active (unrevealed) seed.
    pub fn redacting(round: &Round, active_server_seed: &str) -> Self {
        let server_seed = if round.server_seed == active_server_seed {
            None
        } else {
            Some(round.server_seed.clone())
        };
        Self {
            face: round.face,
            bet: round.bet,
            won: round.won,
            server_seed,
            client_seed: round.client_seed.clone(),
            nonce: round.nonce,
            result_hash: round.result_hash.clone(),
        }
    }
}

/// Public view of a session: the commitment stands in for the server seed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    /// SHA-256 commitment to the active server seed
    pub server_seed_hash: String,
    pub client_seed: String,
    pub nonce: u64,
    pub balance: u64,
    pub bet_amount: u64,
    pub previous_rolls: Vec<RoundView>,
    pub last_hash: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetResponse {
    pub round: RoundView,
    pub balance: u64,
    /// Nonce for the *next* round
    pub nonce: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotateResponse {
    /// The just-retired server seed, now public
    pub revealed_server_seed: String,
    pub session: SessionView,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub report: VerificationReport,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_with_seed(seed: &str) -> Round {
        Round {
            face: 5,
            bet: 10,
            won: true,
            server_seed: seed.to_string(),
            client_seed: "BBBB".to_string(),
            nonce: 0,
            result_hash: "ff7cd8d22a36b16cd56257f334d40c3e95db641959175a2b3541f833b12bb7f8"
                .to_string(),
        }
    }

    #[test]
    fn test_round_view_withholds_active_seed() {
        let round = round_with_seed("active-seed");
        let view = RoundView::redacting(&round, "active-seed");
        assert_eq!(view.server_seed, None);

        let json = serde_json::to_value(&view).expect("Failed to serialize view");
        assert!(json.get("serverSeed").is_none());
    }

    #[test]
    fn test_round_view_reveals_rotated_seed() {
        let round = round_with_seed("retired-seed");
        let view = RoundView::redacting(&round, "active-seed");
        assert_eq!(view.server_seed.as_deref(), Some("retired-seed"));
    }
}
