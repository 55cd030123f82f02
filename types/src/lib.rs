//! Shared types for fairdie.
//!
//! The data model of the provably-fair dice game: round records, the
//! persisted session snapshot, verification reports and the simulator API
//! payloads. Everything here is plain data; the derivation and ledger logic
//! lives in `fairdie-engine`.

pub mod api;
mod constants;
mod round;
mod snapshot;

pub use constants::*;
pub use round::{MalformedRound, Round, VerificationReport};
pub use snapshot::SessionSnapshot;
