//! Vote Ledger
//!
//! Decides what a user's vote signal does to their existing vote on a target.
//! The ledger performs no I/O; the caller persists the outcome with exactly one
//! storage call (insert for `Add`, update for `Update`, delete for `Remove`).

use super::target::VoteTarget;
use super::vote::{Vote, VoteAction, VoteOutcome};
use crate::domain::shared::{ProfileId, Timestamp};

/// Stateless vote decision service.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoteLedger;

impl VoteLedger {
    /// Apply a vote signal to the user's existing vote, if any.
    ///
    /// `existing` must belong to `user_id` on `target`.
    #[must_use]
    pub fn apply_vote(
        existing: Option<Vote>,
        target: &VoteTarget,
        user_id: &ProfileId,
        is_upvote: bool,
        at: Timestamp,
    ) -> VoteOutcome {
        match existing {
            None => VoteOutcome {
                action: VoteAction::Add,
                vote: Vote::cast(target.clone(), user_id.clone(), is_upvote, at),
            },
            Some(vote) if vote.is_upvote == is_upvote => VoteOutcome {
                action: VoteAction::Remove,
                vote,
            },
            Some(mut vote) => {
                vote.is_upvote = is_upvote;
                vote.cast_at = at;
                VoteOutcome {
                    action: VoteAction::Update,
                    vote,
                }
            }
        }
    }
}
