//! Session ledger: nonce progression, balance accounting, bounded round
//! history and seed rotation.
//!
//! A [Session] is a single-owner mutable value. It has no internal locking;
//! callers that take bets from concurrent requests must serialize them with
//! one lock per session so the nonce advances by exactly one per round and
//! every mutation is observed all-or-nothing (the simulator does exactly
//! that).

use thiserror::Error;
use tracing::{debug, info};

use fairdie_types::{
    MalformedRound, Round, SessionSnapshot, DEFAULT_BET_AMOUNT, HISTORY_CAPACITY, INITIAL_BALANCE,
};

use crate::fair;
use crate::seed::{generate_client_seed, generate_server_seed, SeedError};

/// A bet was rejected before any state changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidBet {
    #[error("bet amount must be positive")]
    ZeroAmount,
    #[error("bet {amount} exceeds balance {balance}")]
    ExceedsBalance { amount: u64, balance: u64 },
}

/// A persisted snapshot could not be turned back into a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestoreError {
    #[error("snapshot server seed is empty")]
    EmptyServerSeed,
    #[error("snapshot client seed is empty")]
    EmptyClientSeed,
    #[error("stored round with nonce {nonce} is malformed: {source}")]
    MalformedRound {
        nonce: u64,
        #[source]
        source: MalformedRound,
    },
}

/// The lifetime of one (server seed, client seed, nonce sequence) triple
/// between seed rotations, plus the balance and bounded round history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    server_seed: String,
    commitment: String,
    client_seed: String,
    nonce: u64,
    balance: u64,
    initial_balance: u64,
    bet_amount: u64,
    history: Vec<Round>,
    last_hash: String,
}

impl Session {
    /// Create a session with fresh seeds, a published commitment and
    /// nonce 0.
    pub fn new(initial_balance: u64) -> Result<Self, SeedError> {
        let server_seed = generate_server_seed()?;
        let client_seed = generate_client_seed()?;
        let commitment = fair::commit(&server_seed);
        info!(commitment = %commitment, "session created");
        Ok(Self {
            server_seed,
            commitment,
            client_seed,
            nonce: 0,
            balance: initial_balance,
            initial_balance,
            bet_amount: DEFAULT_BET_AMOUNT,
            history: Vec::new(),
            last_hash: String::new(),
        })
    }

    /// Place a bet and resolve the round.
    ///
    /// Rejects zero and over-balance bets without touching any state.
    /// Otherwise the balance update, history update, nonce increment and
    /// round construction all happen before returning; no partial
    /// application is ever visible.
    pub fn place_bet(&mut self, amount: u64) -> Result<Round, InvalidBet> {
        if amount == 0 {
            return Err(InvalidBet::ZeroAmount);
        }
        if amount > self.balance {
            return Err(InvalidBet::ExceedsBalance {
                amount,
                balance: self.balance,
            });
        }

        // Capture the inputs once. The round record must store exactly the
        // values that were hashed, so the seeds are never read twice.
        let server_seed = self.server_seed.clone();
        let client_seed = self.client_seed.clone();
        let nonce = self.nonce;

        let outcome = fair::derive(&server_seed, &client_seed, nonce);
        let round = Round {
            face: outcome.face,
            bet: amount,
            won: outcome.won,
            server_seed,
            client_seed,
            nonce,
            result_hash: outcome.hash,
        };

        if round.won {
            self.balance += amount;
        } else {
            self.balance -= amount;
        }
        self.last_hash = round.result_hash.clone();
        self.history.insert(0, round.clone());
        self.history.truncate(HISTORY_CAPACITY);
        self.nonce += 1;

        debug!(
            nonce,
            face = round.face,
            won = round.won,
            balance = self.balance,
            "round resolved"
        );
        Ok(round)
    }

    /// Replace the client seed. Takes effect starting with the next round;
    /// past round records keep the seed that was active when they resolved.
    pub fn change_client_seed(&mut self, seed: String) {
        self.client_seed = seed;
    }

    /// Update the preferred bet amount carried in the snapshot.
    pub fn set_bet_amount(&mut self, amount: u64) {
        self.bet_amount = amount;
    }

    /// Set the balance back to `amount` and clear the round history.
    /// Seeds and nonce are untouched.
    ///
    /// Clearing the history forfeits player-side verifiability of the
    /// cleared rounds; retained from the original behavior as a UX tradeoff.
    pub fn reset_balance(&mut self, amount: u64) {
        self.balance = amount;
        self.history.clear();
        self.last_hash.clear();
        info!(balance = amount, "balance reset");
    }

    /// Retire the active server seed and return it, now public. Installs a
    /// fresh server seed, commitment and client seed and resets the nonce
    /// to 0. Past round records are left untouched and remain verifiable
    /// against the revealed seed.
    pub fn rotate_seeds(&mut self) -> Result<String, SeedError> {
        // Draw both seeds before mutating anything so an entropy failure
        // leaves the session unchanged.
        let server_seed = generate_server_seed()?;
        let client_seed = generate_client_seed()?;

        let revealed = std::mem::replace(&mut self.server_seed, server_seed);
        self.commitment = fair::commit(&self.server_seed);
        self.client_seed = client_seed;
        self.nonce = 0;
        info!(commitment = %self.commitment, "seeds rotated");
        Ok(revealed)
    }

    /// Export the persisted shape. Saving it is the caller's job.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            balance: self.balance,
            bet_amount: self.bet_amount,
            server_seed: self.server_seed.clone(),
            client_seed: self.client_seed.clone(),
            nonce: self.nonce,
            previous_rolls: self.history.clone(),
            last_hash: self.last_hash.clone(),
        }
    }

    /// Rebuild a session from a persisted snapshot. The commitment is
    /// recomputed from the stored server seed; stored rounds are
    /// shape-checked before they are trusted.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Result<Self, RestoreError> {
        if snapshot.server_seed.is_empty() {
            return Err(RestoreError::EmptyServerSeed);
        }
        if snapshot.client_seed.is_empty() {
            return Err(RestoreError::EmptyClientSeed);
        }
        for round in &snapshot.previous_rolls {
            round
                .validate()
                .map_err(|source| RestoreError::MalformedRound {
                    nonce: round.nonce,
                    source,
                })?;
        }

        let commitment = fair::commit(&snapshot.server_seed);
        let mut history = snapshot.previous_rolls;
        history.truncate(HISTORY_CAPACITY);
        Ok(Self {
            server_seed: snapshot.server_seed,
            commitment,
            client_seed: snapshot.client_seed,
            nonce: snapshot.nonce,
            balance: snapshot.balance,
            initial_balance: INITIAL_BALANCE,
            bet_amount: snapshot.bet_amount,
            history,
            last_hash: snapshot.last_hash,
        })
    }

    pub fn server_seed(&self) -> &str {
        &self.server_seed
    }

    /// The published one-way hash of the active server seed.
    pub fn commitment(&self) -> &str {
        &self.commitment
    }

    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// The stake [reset_balance](Self::reset_balance) defaults to.
    pub fn initial_balance(&self) -> u64 {
        self.initial_balance
    }

    pub fn bet_amount(&self) -> u64 {
        self.bet_amount
    }

    /// Most-recent rounds, newest first.
    pub fn history(&self) -> &[Round] {
        &self.history
    }

    pub fn last_hash(&self) -> &str {
        &self.last_hash
    }
}
