//! Voting Bounded Context
//!
//! A user holds at most one vote per target. Re-casting the opposite polarity
//! flips that vote; re-casting the same polarity retracts it.

mod guard;
mod ledger;
mod target;
mod vote;

pub use guard::ensure_author;
pub use ledger::VoteLedger;
pub use target::{Target, TargetKind, VoteTarget};
pub use vote::{Vote, VoteAction, VoteOutcome};
