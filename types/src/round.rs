use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{RESULT_HASH_LENGTH, WINNING_FACE_THRESHOLD};

/// A stored round failed basic shape checks during verification.
///
/// Each variant carries the offending value so callers can explain the
/// failure to the end user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRound {
    #[error("die face out of range 1-6: {0}")]
    FaceOutOfRange(u8),
    #[error("bet amount must be positive")]
    ZeroBet,
    #[error("result hash is not 64 lowercase hex characters: {0:?}")]
    BadResultHash(String),
    #[error("won flag disagrees with face {face}")]
    InconsistentWinFlag { face: u8 },
}

/// One resolved bet, fully described by its inputs, hash and outcome.
///
/// Immutable once created: the stored seeds are the values that were active
/// when the round resolved, so the record stays verifiable after client seed
/// changes and seed rotations. Wire names match the persisted snapshot shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Die face rolled (1-6)
    #[serde(rename = "diceValue")]
    pub face: u8,
    /// Amount wagered
    #[serde(rename = "betAmount")]
    pub bet: u64,
    /// Whether the round won (face >= 4)
    pub won: bool,
    /// Server seed active when the round resolved
    #[serde(rename = "serverSeed")]
    pub server_seed: String,
    /// Client seed active when the round resolved
    #[serde(rename = "clientSeed")]
    pub client_seed: String,
    /// Per-session round counter at resolution time
    pub nonce: u64,
    /// Lowercase hex SHA-256 of "serverSeed:clientSeed:nonce"
    #[serde(rename = "hash")]
    pub result_hash: String,
}

impl Round {
    /// Shape-check the record before any recomputation.
    ///
    /// Catches corrupted or hand-edited records: face out of range, zero
    /// bet, a result hash that is not 64 lowercase hex characters, or a won
    /// flag that disagrees with the face.
    pub fn validate(&self) -> Result<(), MalformedRound> {
        if !(1..=6).contains(&self.face) {
            return Err(MalformedRound::FaceOutOfRange(self.face));
        }
        if self.bet == 0 {
            return Err(MalformedRound::ZeroBet);
        }
        if self.result_hash.len() != RESULT_HASH_LENGTH
            || !self
                .result_hash
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(MalformedRound::BadResultHash(self.result_hash.clone()));
        }
        if self.won != (self.face >= WINNING_FACE_THRESHOLD) {
            return Err(MalformedRound::InconsistentWinFlag { face: self.face });
        }
        Ok(())
    }
}

/// Result of independently re-deriving a historical round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    /// Face recomputed from the round's stored inputs
    pub recomputed_face: u8,
    /// Hash recomputed from the round's stored inputs
    pub recomputed_hash: String,
    /// Recomputed face and hash both match the stored record
    pub matches_outcome: bool,
    /// Whether the stored server seed hashes to the supplied commitment.
    /// `None` when no commitment was supplied (older or offline records);
    /// absence is reported, not treated as failure.
    pub matches_commitment: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_round() -> Round {
        Round {
            face: 5,
            bet: 10,
            won: true,
            server_seed: "A".repeat(64),
            client_seed: "BBBB".to_string(),
            nonce: 0,
            result_hash: "ff7cd8d22a36b16cd56257f334d40c3e95db641959175a2b3541f833b12bb7f8"
                .to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_round() {
        assert_eq!(valid_round().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_face_out_of_range() {
        let mut round = valid_round();
        round.face = 0;
        assert_eq!(round.validate(), Err(MalformedRound::FaceOutOfRange(0)));

        round.face = 7;
        round.won = true;
        assert_eq!(round.validate(), Err(MalformedRound::FaceOutOfRange(7)));
    }

    #[test]
    fn test_validate_rejects_zero_bet() {
        let mut round = valid_round();
        round.bet = 0;
        assert_eq!(round.validate(), Err(MalformedRound::ZeroBet));
    }

    #[test]
    fn test_validate_rejects_bad_hash() {
        // Too short
        let mut round = valid_round();
        round.result_hash = "ff7cd8d2".to_string();
        assert!(matches!(
            round.validate(),
            Err(MalformedRound::BadResultHash(_))
        ));

        // Uppercase hex is not the canonical encoding
        let mut round = valid_round();
        round.result_hash = round.result_hash.to_uppercase();
        assert!(matches!(
            round.validate(),
            Err(MalformedRound::BadResultHash(_))
        ));

        // Non-hex characters
        let mut round = valid_round();
        round.result_hash = "z".repeat(64);
        assert!(matches!(
            round.validate(),
            Err(MalformedRound::BadResultHash(_))
        ));
    }

    #[test]
    fn test_validate_rejects_inconsistent_win_flag() {
        let mut round = valid_round();
        round.won = false;
        assert_eq!(
            round.validate(),
            Err(MalformedRound::InconsistentWinFlag { face: 5 })
        );
    }

    #[test]
    fn test_round_wire_names_match_snapshot_shape() {
        let json = serde_json::to_value(valid_round()).expect("Failed to serialize round");
        assert!(json.get("diceValue").is_some());
        assert!(json.get("betAmount").is_some());
        assert!(json.get("serverSeed").is_some());
        assert!(json.get("clientSeed").is_some());
        assert!(json.get("hash").is_some());
        assert!(json.get("nonce").is_some());
        assert!(json.get("won").is_some());
    }
}
