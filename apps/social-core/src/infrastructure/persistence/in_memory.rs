//! In-memory adapters for testing and development.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::application::ports::{ProfileRepository, SubscriptionStore, TargetRepository};
use crate::domain::errors::RepositoryError;
use crate::domain::shared::{ProfileId, VoteId};
use crate::domain::social::{Profile, Subscription};
use crate::domain::voting::{Target, Vote, VoteTarget};

// =============================================================================
// Targets and votes
// =============================================================================

/// In-memory implementation of [`TargetRepository`].
///
/// Suitable for testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryTargetRepository {
    targets: RwLock<HashMap<VoteTarget, Target>>,
    votes: RwLock<HashMap<(VoteTarget, ProfileId), Vote>>,
}

impl InMemoryTargetRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a post or comment (for test setup).
    pub fn insert_target(&self, target: Target) {
        self.targets.write().insert(target.reference.clone(), target);
    }

    /// Number of stored votes across all targets.
    #[must_use]
    pub fn vote_count(&self) -> usize {
        self.votes.read().len()
    }

    /// Votes stored for one target.
    #[must_use]
    pub fn votes_for(&self, target: &VoteTarget) -> Vec<Vote> {
        self.votes
            .read()
            .values()
            .filter(|v| &v.target == target)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TargetRepository for InMemoryTargetRepository {
    async fn get_by_id(&self, target: &VoteTarget) -> Result<Option<Target>, RepositoryError> {
        Ok(self.targets.read().get(target).cloned())
    }

    async fn find_vote(
        &self,
        target: &VoteTarget,
        user_id: &ProfileId,
    ) -> Result<Option<Vote>, RepositoryError> {
        Ok(self
            .votes
            .read()
            .get(&(target.clone(), user_id.clone()))
            .cloned())
    }

    async fn save_vote(&self, vote: &Vote) -> Result<(), RepositoryError> {
        let key = (vote.target.clone(), vote.user_id.clone());
        let mut votes = self.votes.write();
        if votes.contains_key(&key) {
            return Err(RepositoryError::storage(format!(
                "duplicate vote by {} on {}",
                vote.user_id, vote.target
            )));
        }
        votes.insert(key, vote.clone());
        Ok(())
    }

    async fn update_vote(&self, vote: &Vote) -> Result<(), RepositoryError> {
        let key = (vote.target.clone(), vote.user_id.clone());
        match self.votes.write().get_mut(&key) {
            Some(stored) if stored.id == vote.id => {
                *stored = vote.clone();
                Ok(())
            }
            _ => Err(RepositoryError::storage(format!("vote not found: {}", vote.id))),
        }
    }

    async fn delete_vote(&self, id: &VoteId) -> Result<(), RepositoryError> {
        self.votes.write().retain(|_, v| &v.id != id);
        Ok(())
    }
}

// =============================================================================
// Profiles
// =============================================================================

/// In-memory implementation of [`ProfileRepository`].
#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<ProfileId, Profile>>,
}

impl InMemoryProfileRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a profile.
    pub fn insert(&self, profile: Profile) {
        self.profiles.write().insert(profile.id.clone(), profile);
    }

    /// Number of stored profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    /// Whether no profiles are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn get_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError> {
        Ok(self.profiles.read().get(id).cloned())
    }
}

// =============================================================================
// Subscriptions
// =============================================================================

/// In-memory implementation of [`SubscriptionStore`].
#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    edges: RwLock<HashMap<(ProfileId, ProfileId), Subscription>>,
}

impl InMemorySubscriptionStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn add(&self, subscription: &Subscription) -> Result<(), RepositoryError> {
        let key = (
            subscription.subscriber_id.clone(),
            subscription.publisher_id.clone(),
        );
        self.edges.write().insert(key, subscription.clone());
        Ok(())
    }

    async fn remove(
        &self,
        subscriber_id: &ProfileId,
        publisher_id: &ProfileId,
    ) -> Result<(), RepositoryError> {
        self.edges
            .write()
            .remove(&(subscriber_id.clone(), publisher_id.clone()));
        Ok(())
    }

    async fn list_by_subscriber(
        &self,
        subscriber_id: &ProfileId,
    ) -> Result<Vec<Subscription>, RepositoryError> {
        Ok(self
            .edges
            .read()
            .values()
            .filter(|s| &s.subscriber_id == subscriber_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Subscription>, RepositoryError> {
        Ok(self.edges.read().values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::Timestamp;

    fn post() -> VoteTarget {
        VoteTarget::post("p-1")
    }

    #[tokio::test]
    async fn vote_lifecycle() {
        let repo = InMemoryTargetRepository::new();
        let user = ProfileId::new("alice");
        let mut vote = Vote::cast(post(), user.clone(), true, Timestamp::now());

        repo.save_vote(&vote).await.unwrap();
        assert_eq!(repo.find_vote(&post(), &user).await.unwrap(), Some(vote.clone()));

        vote.is_upvote = false;
        repo.update_vote(&vote).await.unwrap();
        assert_eq!(repo.votes_for(&post())[0].is_upvote, false);

        repo.delete_vote(&vote.id).await.unwrap();
        assert_eq!(repo.vote_count(), 0);
    }

    #[tokio::test]
    async fn second_insert_for_same_user_and_target_fails() {
        let repo = InMemoryTargetRepository::new();
        let user = ProfileId::new("alice");

        repo.save_vote(&Vote::cast(post(), user.clone(), true, Timestamp::now()))
            .await
            .unwrap();
        let result = repo
            .save_vote(&Vote::cast(post(), user, false, Timestamp::now()))
            .await;

        assert!(result.is_err());
        assert_eq!(repo.vote_count(), 1);
    }

    #[tokio::test]
    async fn update_of_unknown_vote_fails() {
        let repo = InMemoryTargetRepository::new();
        let vote = Vote::cast(post(), ProfileId::new("alice"), true, Timestamp::now());

        assert!(repo.update_vote(&vote).await.is_err());
    }

    #[tokio::test]
    async fn votes_on_post_and_comment_with_same_id_are_separate() {
        let repo = InMemoryTargetRepository::new();
        let user = ProfileId::new("alice");

        repo.save_vote(&Vote::cast(VoteTarget::post("x"), user.clone(), true, Timestamp::now()))
            .await
            .unwrap();

        assert!(repo.find_vote(&VoteTarget::comment("x"), &user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn subscription_store_lists_by_subscriber() {
        let store = InMemorySubscriptionStore::new();
        let alice = ProfileId::new("alice");
        store
            .add(&Subscription::new(alice.clone(), ProfileId::new("bob")))
            .await
            .unwrap();
        store
            .add(&Subscription::new(ProfileId::new("carol"), ProfileId::new("bob")))
            .await
            .unwrap();

        assert_eq!(store.list_by_subscriber(&alice).await.unwrap().len(), 1);
        assert_eq!(store.list_all().await.unwrap().len(), 2);

        store.remove(&alice, &ProfileId::new("bob")).await.unwrap();
        assert!(store.list_by_subscriber(&alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn profile_lookup() {
        let repo = InMemoryProfileRepository::new();
        repo.insert(Profile::new("bob", "Bob"));

        assert_eq!(
            repo.get_by_id(&ProfileId::new("bob")).await.unwrap().map(|p| p.user_name),
            Some("Bob".to_string())
        );
        assert!(repo.get_by_id(&ProfileId::new("nobody")).await.unwrap().is_none());
    }
}
