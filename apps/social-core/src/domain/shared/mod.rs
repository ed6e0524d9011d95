//! Shared Domain Types
//!
//! Value objects shared across bounded contexts.

mod identifiers;
mod timestamp;

pub use identifiers::{ProfileId, TargetId, VoteId};
pub use timestamp::Timestamp;
