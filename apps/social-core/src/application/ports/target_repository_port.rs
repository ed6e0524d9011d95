//! Target Repository Port (Driven Port)
//!
//! Loads posts and comments and persists the votes they carry.

use async_trait::async_trait;

use crate::domain::errors::RepositoryError;
use crate::domain::shared::{ProfileId, VoteId};
use crate::domain::voting::{Target, Vote, VoteTarget};

/// Port for vote targets and their votes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TargetRepository: Send + Sync {
    /// Load a post or comment.
    async fn get_by_id(&self, target: &VoteTarget) -> Result<Option<Target>, RepositoryError>;

    /// Find the user's vote on a target.
    async fn find_vote(
        &self,
        target: &VoteTarget,
        user_id: &ProfileId,
    ) -> Result<Option<Vote>, RepositoryError>;

    /// Insert a new vote.
    async fn save_vote(&self, vote: &Vote) -> Result<(), RepositoryError>;

    /// Overwrite an existing vote.
    async fn update_vote(&self, vote: &Vote) -> Result<(), RepositoryError>;

    /// Delete a vote by id.
    async fn delete_vote(&self, id: &VoteId) -> Result<(), RepositoryError>;
}
