//! Subscription Store Port (Driven Port)
//!
//! Durable backing for the subscription registry. The registry writes every
//! mutation here before touching its in-memory index.

use async_trait::async_trait;

use crate::domain::errors::RepositoryError;
use crate::domain::shared::ProfileId;
use crate::domain::social::Subscription;

/// Port for persisting subscription edges.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Persist a new edge.
    async fn add(&self, subscription: &Subscription) -> Result<(), RepositoryError>;

    /// Remove the edge for the pair.
    async fn remove(
        &self,
        subscriber_id: &ProfileId,
        publisher_id: &ProfileId,
    ) -> Result<(), RepositoryError>;

    /// All edges where `subscriber_id` is the subscriber.
    async fn list_by_subscriber(
        &self,
        subscriber_id: &ProfileId,
    ) -> Result<Vec<Subscription>, RepositoryError>;

    /// Every stored edge.
    async fn list_all(&self) -> Result<Vec<Subscription>, RepositoryError>;
}
