//! Provably-fair derivation and ledger engine.
//!
//! The engine deterministically derives a die face (1-6) from a server-held
//! secret seed, a player-chosen client seed and a strictly increasing round
//! counter. The server commits to its seed (SHA-256, published up front)
//! before any round is played and reveals it on rotation, after which every
//! past round can be independently re-derived and checked by the player:
//!
//! - [seed] generates server and client seeds from OS entropy.
//! - [fair] holds the commit-then-reveal hashing scheme and the
//!   hash-to-face mapping.
//! - [session] sequences rounds: nonce progression, balance accounting,
//!   bounded history and seed rotation.
//! - [verify] re-derives historical rounds and checks them against the
//!   recorded result and the published commitment.

pub mod fair;
pub mod seed;
pub mod session;
pub mod verify;

pub use fair::{commit, derive, is_win, Outcome};
pub use seed::{generate_client_seed, generate_seed, generate_server_seed, SeedError};
pub use session::{InvalidBet, RestoreError, Session};
pub use verify::{verify, VerifyError};
