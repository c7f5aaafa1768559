//! repledger - Reputation ledger and trust scoring
//!
//! Records one vote per (user, target) with toggle/flip semantics, keeps the
//! derived counters (content scores, user karma, community reputation)
//! consistent with that ledger, and scores user trust from the aggregates.
//!
//! ## Key Concepts
//!
//! - **Ledger first**: the `votes` table is the only durable record of voter
//!   intent; every counter is a cache over it
//! - **Atomic casts**: one vote updates the ledger and all three counter
//!   families in a single transaction
//! - **Reconciliation**: aggregates can always be recomputed from ground
//!   truth to repair drift
//! - **Derived trust**: a 0-100 score and discrete level computed from
//!   karma, account age, report history, and community participation

pub mod cli;
pub mod config;
pub mod core;

pub use crate::core::error::{EngineError, EngineResult};
pub use crate::core::model::{
    BatchOutcome, Community, CommunityReputation, Content, KarmaTotals, TargetKind, User, Vote,
    VoteOutcome, VoteState, VoteValue,
};
pub use crate::core::store::Store;
pub use crate::core::trust::{TrustCalculator, TrustInputs, TrustLevel, TrustParams};
