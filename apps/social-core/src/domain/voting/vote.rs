//! Vote entity and the action a new vote signal resolves to.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::target::VoteTarget;
use crate::domain::shared::{ProfileId, Timestamp, VoteId};

/// A single user's vote on a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Vote identifier.
    pub id: VoteId,
    /// Voted-on target.
    pub target: VoteTarget,
    /// Profile that cast the vote.
    pub user_id: ProfileId,
    /// `true` for an upvote, `false` for a downvote.
    pub is_upvote: bool,
    /// When the current polarity was cast.
    pub cast_at: Timestamp,
}

impl Vote {
    /// Create a fresh vote with a generated id.
    #[must_use]
    pub fn cast(target: VoteTarget, user_id: ProfileId, is_upvote: bool, at: Timestamp) -> Self {
        Self {
            id: VoteId::generate(),
            target,
            user_id,
            is_upvote,
            cast_at: at,
        }
    }
}

/// How a vote signal changed the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteAction {
    /// No prior vote existed; a new one was created.
    Add,
    /// A prior vote of opposite polarity was flipped.
    Update,
    /// A prior vote of the same polarity was retracted.
    Remove,
}

impl VoteAction {
    /// Lowercase name for logs and metric labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for VoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of applying a vote signal.
///
/// For `Add` and `Update` the vote is the row to insert or update. For
/// `Remove` it is the existing row the caller must delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    /// Resolved action.
    pub action: VoteAction,
    /// Vote the action applies to.
    pub vote: Vote,
}

impl VoteOutcome {
    /// Polarity left on the target after the action, if any.
    #[must_use]
    pub const fn resulting_polarity(&self) -> Option<bool> {
        match self.action {
            VoteAction::Add | VoteAction::Update => Some(self.vote.is_upvote),
            VoteAction::Remove => None,
        }
    }
}
