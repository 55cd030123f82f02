//! Independent re-derivation of historical rounds.

use thiserror::Error;

use fairdie_types::{MalformedRound, Round, VerificationReport};

use crate::fair;

/// Error during verification. Malformed records surface here instead of
/// crashing the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error(transparent)]
    MalformedRound(#[from] MalformedRound),
}

/// Recompute a round's hash and face from its stored inputs and compare
/// them with the recorded result.
///
/// When a commitment is supplied, additionally checks that the stored
/// server seed hashes to it; when none is supplied that is reported as
/// `matches_commitment: None`, not treated as failure. Never mutates state
/// and is safe to call concurrently and repeatedly.
pub fn verify(
    round: &Round,
    commitment: Option<&str>,
) -> Result<VerificationReport, VerifyError> {
    round.validate()?;

    let outcome = fair::derive(&round.server_seed, &round.client_seed, round.nonce);
    let matches_outcome = outcome.face == round.face && outcome.hash == round.result_hash;
    let matches_commitment = commitment.map(|c| fair::commit(&round.server_seed) == c);

    Ok(VerificationReport {
        recomputed_face: outcome.face,
        recomputed_hash: outcome.hash,
        matches_outcome,
        matches_commitment,
    })
}
