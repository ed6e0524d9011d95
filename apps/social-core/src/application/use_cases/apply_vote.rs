//! Apply Vote Use Case
//!
//! Looks up the target, resolves the vote signal through the [`VoteLedger`],
//! persists the outcome and tells the target's author's subscribers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::ports::{AuthorNotifier, ProfileRepository, TargetRepository};
use crate::application::services::KeyedLock;
use crate::domain::errors::CoreError;
use crate::domain::shared::{ProfileId, TargetId, Timestamp};
use crate::domain::voting::{Target, TargetKind, VoteAction, VoteLedger, VoteOutcome, VoteTarget};
use crate::observability::record_vote_applied;

/// Voting behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingPolicy {
    /// Whether retracting a vote still notifies the author's subscribers.
    pub notify_on_retract: bool,
}

impl Default for VotingPolicy {
    fn default() -> Self {
        Self {
            notify_on_retract: true,
        }
    }
}

impl VotingPolicy {
    const fn should_notify(&self, action: VoteAction) -> bool {
        match action {
            VoteAction::Add | VoteAction::Update => true,
            VoteAction::Remove => self.notify_on_retract,
        }
    }
}

type VoteKey = (TargetKind, TargetId, ProfileId);

/// Use case for casting, flipping and retracting votes.
pub struct VotingUseCase<R, P, N>
where
    R: TargetRepository,
    P: ProfileRepository,
    N: AuthorNotifier,
{
    targets: Arc<R>,
    profiles: Arc<P>,
    notifier: Arc<N>,
    policy: VotingPolicy,
    vote_locks: KeyedLock<VoteKey>,
}

impl<R, P, N> VotingUseCase<R, P, N>
where
    R: TargetRepository,
    P: ProfileRepository,
    N: AuthorNotifier,
{
    /// Create a new VotingUseCase.
    pub fn new(targets: Arc<R>, profiles: Arc<P>, notifier: Arc<N>, policy: VotingPolicy) -> Self {
        Self {
            targets,
            profiles,
            notifier,
            policy,
            vote_locks: KeyedLock::new(),
        }
    }

    /// Current policy.
    #[must_use]
    pub const fn policy(&self) -> VotingPolicy {
        self.policy
    }

    /// Apply `user_id`'s vote signal to `target`.
    ///
    /// Casting the same polarity twice retracts the vote; casting the
    /// opposite polarity flips it.
    ///
    /// # Errors
    ///
    /// - [`CoreError::TargetNotFound`] if the target does not exist. Nothing
    ///   is persisted and nobody is notified.
    /// - [`CoreError::ProfileNotFound`] if the target's author has no
    ///   profile. The vote is already persisted at that point and stands.
    /// - [`CoreError::Repository`] on storage failure.
    pub async fn apply_vote(
        &self,
        target: &VoteTarget,
        user_id: &ProfileId,
        is_upvote: bool,
    ) -> Result<VoteOutcome, CoreError> {
        let (loaded, outcome) = self.record_vote(target, user_id, is_upvote).await?;

        record_vote_applied(target.kind, outcome.action);
        tracing::info!(
            vote_target = %target,
            user_id = %user_id,
            action = %outcome.action,
            "Vote applied"
        );

        if !self.policy.should_notify(outcome.action) {
            return Ok(outcome);
        }

        let author = match self.profiles.get_by_id(&loaded.author_id).await? {
            Some(author) => author,
            None => {
                tracing::error!(
                    vote_target = %target,
                    author_id = %loaded.author_id,
                    "Author profile missing for voted target"
                );
                return Err(CoreError::ProfileNotFound {
                    profile_id: loaded.author_id,
                });
            }
        };

        let report = self.notifier.notify(&author, &loaded.vote_message()).await;
        if !report.is_complete() {
            tracing::warn!(
                vote_target = %target,
                failed = report.failed,
                attempted = report.attempted,
                "Some vote notifications were not delivered"
            );
        }

        Ok(outcome)
    }

    /// The user's current polarity on `target`, if they have voted.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Repository`] on storage failure.
    pub async fn get_user_vote(
        &self,
        target: &VoteTarget,
        user_id: &ProfileId,
    ) -> Result<Option<bool>, CoreError> {
        let vote = self.targets.find_vote(target, user_id).await?;
        Ok(vote.map(|v| v.is_upvote))
    }

    /// Steps that must not interleave for the same `(target, user)`.
    async fn record_vote(
        &self,
        target: &VoteTarget,
        user_id: &ProfileId,
        is_upvote: bool,
    ) -> Result<(Target, VoteOutcome), CoreError> {
        let _guard = self
            .vote_locks
            .lock((target.kind, target.id.clone(), user_id.clone()))
            .await;

        let loaded = self
            .targets
            .get_by_id(target)
            .await?
            .ok_or_else(|| CoreError::TargetNotFound {
                kind: target.kind,
                target_id: target.id.clone(),
            })?;

        let existing = self.targets.find_vote(target, user_id).await?;
        let outcome = VoteLedger::apply_vote(existing, target, user_id, is_upvote, Timestamp::now());

        match outcome.action {
            VoteAction::Add => self.targets.save_vote(&outcome.vote).await?,
            VoteAction::Update => self.targets.update_vote(&outcome.vote).await?,
            VoteAction::Remove => self.targets.delete_vote(&outcome.vote.id).await?,
        }

        Ok((loaded, outcome))
    }
}
