//! Vote targets: posts and comments.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{ProfileId, TargetId};

/// Kind of entity a vote applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// A top-level post.
    Post,
    /// A comment on a post.
    Comment,
}

impl TargetKind {
    /// Lowercase name used in logs, metric labels and storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable reference to a votable entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteTarget {
    /// Target identifier.
    pub id: TargetId,
    /// Post or comment.
    pub kind: TargetKind,
}

impl VoteTarget {
    /// Reference a post.
    #[must_use]
    pub fn post(id: impl Into<TargetId>) -> Self {
        Self {
            id: id.into(),
            kind: TargetKind::Post,
        }
    }

    /// Reference a comment.
    #[must_use]
    pub fn comment(id: impl Into<TargetId>) -> Self {
        Self {
            id: id.into(),
            kind: TargetKind::Comment,
        }
    }
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// A loaded post or comment, reduced to what the core needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Which entity this is.
    pub reference: VoteTarget,
    /// Profile that wrote it.
    pub author_id: ProfileId,
}

impl Target {
    /// Create a loaded target.
    #[must_use]
    pub const fn new(reference: VoteTarget, author_id: ProfileId) -> Self {
        Self {
            reference,
            author_id,
        }
    }

    /// Target identifier.
    #[must_use]
    pub const fn id(&self) -> &TargetId {
        &self.reference.id
    }

    /// Target kind.
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        self.reference.kind
    }

    /// Message sent to the author's subscribers when the target is voted on.
    #[must_use]
    pub fn vote_message(&self) -> String {
        format!("Your {} ({}) received a new vote.", self.kind(), self.id())
    }
}
