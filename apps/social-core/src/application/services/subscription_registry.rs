//! Subscription Registry
//!
//! In-memory index of subscriber -> publisher edges backed by a durable
//! [`SubscriptionStore`].
//!
//! # Consistency
//!
//! - Every mutation is written to the store first; the index is only updated
//!   once the store call succeeded.
//! - [`SubscriptionRegistry::load`] builds the index from `list_all`;
//!   [`SubscriptionRegistry::reload`] rebuilds it on demand.
//! - Mutations of the same `(subscriber, publisher)` pair are serialized, and
//!   a reload waits for in-flight mutations to finish.
//!
//! # Example
//!
//! ```rust,ignore
//! let registry = SubscriptionRegistry::load(Arc::new(InMemorySubscriptionStore::new())).await?;
//!
//! let bob = ProfileId::new("bob");
//! registry.subscribe(&ProfileId::new("alice"), &bob).await?;
//! registry.subscribe(&ProfileId::new("carol"), &bob).await?;
//!
//! assert_eq!(registry.resolve_subscribers(&bob).len(), 2);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use super::keyed_lock::KeyedLock;
use crate::application::ports::SubscriptionStore;
use crate::domain::errors::CoreError;
use crate::domain::shared::ProfileId;
use crate::domain::social::Subscription;
use crate::observability::{SubscriptionChange, record_subscription_change, set_subscription_count};

// =============================================================================
// Edge Index
// =============================================================================

/// Both directions of the edge set.
#[derive(Debug, Default)]
struct EdgeIndex {
    /// publisher -> subscribers
    subscribers_of: HashMap<ProfileId, HashSet<ProfileId>>,
    /// subscriber -> publishers
    publishers_of: HashMap<ProfileId, HashSet<ProfileId>>,
    edge_count: usize,
}

impl EdgeIndex {
    fn from_edges(edges: &[Subscription]) -> Self {
        let mut index = Self::default();
        for edge in edges {
            index.insert(&edge.subscriber_id, &edge.publisher_id);
        }
        index
    }

    fn contains(&self, subscriber: &ProfileId, publisher: &ProfileId) -> bool {
        self.subscribers_of
            .get(publisher)
            .is_some_and(|subs| subs.contains(subscriber))
    }

    /// Returns false if the edge was already present.
    fn insert(&mut self, subscriber: &ProfileId, publisher: &ProfileId) -> bool {
        let added = self
            .subscribers_of
            .entry(publisher.clone())
            .or_default()
            .insert(subscriber.clone());
        if added {
            self.publishers_of
                .entry(subscriber.clone())
                .or_default()
                .insert(publisher.clone());
            self.edge_count += 1;
        }
        added
    }

    fn remove(&mut self, subscriber: &ProfileId, publisher: &ProfileId) -> bool {
        let Some(subs) = self.subscribers_of.get_mut(publisher) else {
            return false;
        };
        if !subs.remove(subscriber) {
            return false;
        }
        if subs.is_empty() {
            self.subscribers_of.remove(publisher);
        }

        if let Some(pubs) = self.publishers_of.get_mut(subscriber) {
            pubs.remove(publisher);
            if pubs.is_empty() {
                self.publishers_of.remove(subscriber);
            }
        }
        self.edge_count -= 1;
        true
    }

    fn stats(&self) -> RegistryStats {
        RegistryStats {
            edges: self.edge_count,
            publishers: self.subscribers_of.len(),
            subscribers: self.publishers_of.len(),
        }
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Counts describing the cached edge set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Number of subscription edges.
    pub edges: usize,
    /// Profiles with at least one subscriber.
    pub publishers: usize,
    /// Profiles following at least one publisher.
    pub subscribers: usize,
}

/// Write-through cache of subscription edges.
pub struct SubscriptionRegistry<S: SubscriptionStore> {
    store: Arc<S>,
    index: RwLock<EdgeIndex>,
    pair_locks: KeyedLock<(ProfileId, ProfileId)>,
    /// Held shared by mutations, exclusively by reloads.
    reload_gate: tokio::sync::RwLock<()>,
}

impl<S: SubscriptionStore> SubscriptionRegistry<S> {
    /// Build the registry from every edge in `store`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Repository`] if the store cannot be read.
    pub async fn load(store: Arc<S>) -> Result<Self, CoreError> {
        let edges = store.list_all().await?;
        let index = EdgeIndex::from_edges(&edges);
        let stats = index.stats();

        tracing::info!(
            edges = stats.edges,
            publishers = stats.publishers,
            subscribers = stats.subscribers,
            "Subscription registry loaded"
        );
        set_subscription_count(stats.edges);

        Ok(Self {
            store,
            index: RwLock::new(index),
            pair_locks: KeyedLock::new(),
            reload_gate: tokio::sync::RwLock::new(()),
        })
    }

    /// Discard the cached index and rebuild it from storage.
    ///
    /// Returns the number of edges loaded.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Repository`] if the store cannot be read; the
    /// previous index is kept in that case.
    pub async fn reload(&self) -> Result<usize, CoreError> {
        let _gate = self.reload_gate.write().await;
        let edges = self.store.list_all().await?;
        let fresh = EdgeIndex::from_edges(&edges);
        let count = fresh.edge_count;
        *self.index.write() = fresh;

        tracing::info!(edges = count, "Subscription registry reloaded");
        set_subscription_count(count);
        Ok(count)
    }

    /// Make `subscriber` follow `publisher`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::AlreadySubscribed`] if the edge exists.
    /// - [`CoreError::Repository`] if the store write fails; the index is
    ///   left unchanged.
    pub async fn subscribe(
        &self,
        subscriber: &ProfileId,
        publisher: &ProfileId,
    ) -> Result<Subscription, CoreError> {
        let _gate = self.reload_gate.read().await;
        let _pair = self
            .pair_locks
            .lock((subscriber.clone(), publisher.clone()))
            .await;

        if self.index.read().contains(subscriber, publisher) {
            return Err(CoreError::AlreadySubscribed {
                subscriber_id: subscriber.clone(),
                publisher_id: publisher.clone(),
            });
        }

        let subscription = Subscription::new(subscriber.clone(), publisher.clone());
        self.store.add(&subscription).await?;

        let edges = {
            let mut index = self.index.write();
            index.insert(subscriber, publisher);
            index.edge_count
        };

        tracing::info!(
            subscriber_id = %subscriber,
            publisher_id = %publisher,
            "Subscribed"
        );
        record_subscription_change(SubscriptionChange::Subscribe);
        set_subscription_count(edges);

        Ok(subscription)
    }

    /// Remove the edge `subscriber` -> `publisher`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::SubscriptionNotFound`] if there is no such edge.
    /// - [`CoreError::Repository`] if the store write fails; the index is
    ///   left unchanged.
    pub async fn unsubscribe(
        &self,
        subscriber: &ProfileId,
        publisher: &ProfileId,
    ) -> Result<(), CoreError> {
        let _gate = self.reload_gate.read().await;
        let _pair = self
            .pair_locks
            .lock((subscriber.clone(), publisher.clone()))
            .await;

        if !self.index.read().contains(subscriber, publisher) {
            return Err(CoreError::SubscriptionNotFound {
                subscriber_id: subscriber.clone(),
                publisher_id: publisher.clone(),
            });
        }

        self.store.remove(subscriber, publisher).await?;

        let edges = {
            let mut index = self.index.write();
            index.remove(subscriber, publisher);
            index.edge_count
        };

        tracing::info!(
            subscriber_id = %subscriber,
            publisher_id = %publisher,
            "Unsubscribed"
        );
        record_subscription_change(SubscriptionChange::Unsubscribe);
        set_subscription_count(edges);

        Ok(())
    }

    /// Everyone currently subscribed to `publisher`.
    #[must_use]
    pub fn resolve_subscribers(&self, publisher: &ProfileId) -> HashSet<ProfileId> {
        self.index
            .read()
            .subscribers_of
            .get(publisher)
            .cloned()
            .unwrap_or_default()
    }

    /// Everyone `subscriber` follows (the authors of their feed).
    #[must_use]
    pub fn resolve_publishers(&self, subscriber: &ProfileId) -> HashSet<ProfileId> {
        self.index
            .read()
            .publishers_of
            .get(subscriber)
            .cloned()
            .unwrap_or_default()
    }

    /// Publishers `subscriber` follows, read from durable storage.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Repository`] if the store cannot be read.
    pub async fn get_subscribed_authors(
        &self,
        subscriber: &ProfileId,
    ) -> Result<Vec<ProfileId>, CoreError> {
        let edges = self.store.list_by_subscriber(subscriber).await?;
        Ok(edges.into_iter().map(|s| s.publisher_id).collect())
    }

    /// Whether the edge exists in the cached index.
    #[must_use]
    pub fn is_subscribed(&self, subscriber: &ProfileId, publisher: &ProfileId) -> bool {
        self.index.read().contains(subscriber, publisher)
    }

    /// Counts for the cached edge set.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        self.index.read().stats()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockSubscriptionStore;
    use crate::domain::errors::RepositoryError;
    use crate::infrastructure::persistence::InMemorySubscriptionStore;

    fn id(name: &str) -> ProfileId {
        ProfileId::new(name)
    }

    async fn empty_registry() -> SubscriptionRegistry<InMemorySubscriptionStore> {
        SubscriptionRegistry::load(Arc::new(InMemorySubscriptionStore::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn resolve_subscribers_after_subscribe_and_unsubscribe() {
        let registry = empty_registry().await;

        registry.subscribe(&id("s1"), &id("p")).await.unwrap();
        registry.subscribe(&id("s2"), &id("p")).await.unwrap();
        assert_eq!(
            registry.resolve_subscribers(&id("p")),
            HashSet::from([id("s1"), id("s2")])
        );

        registry.unsubscribe(&id("s1"), &id("p")).await.unwrap();
        assert_eq!(registry.resolve_subscribers(&id("p")), HashSet::from([id("s2")]));
    }

    #[tokio::test]
    async fn duplicate_subscribe_is_rejected() {
        let registry = empty_registry().await;
        registry.subscribe(&id("s1"), &id("p")).await.unwrap();

        let err = registry.subscribe(&id("s1"), &id("p")).await.unwrap_err();

        assert!(matches!(err, CoreError::AlreadySubscribed { .. }));
        assert_eq!(registry.stats().edges, 1);
    }

    #[tokio::test]
    async fn unsubscribe_missing_edge_leaves_set_unchanged() {
        let registry = empty_registry().await;
        registry.subscribe(&id("s1"), &id("p")).await.unwrap();

        let err = registry.unsubscribe(&id("s2"), &id("p")).await.unwrap_err();

        assert!(matches!(err, CoreError::SubscriptionNotFound { .. }));
        assert_eq!(registry.resolve_subscribers(&id("p")), HashSet::from([id("s1")]));
    }

    #[tokio::test]
    async fn resolve_subscribers_is_idempotent() {
        let registry = empty_registry().await;
        registry.subscribe(&id("s1"), &id("p")).await.unwrap();
        registry.subscribe(&id("s2"), &id("p")).await.unwrap();

        let first = registry.resolve_subscribers(&id("p"));
        let second = registry.resolve_subscribers(&id("p"));

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn resolve_publishers_builds_feed_authors() {
        let registry = empty_registry().await;
        registry.subscribe(&id("alice"), &id("bob")).await.unwrap();
        registry.subscribe(&id("alice"), &id("diana")).await.unwrap();
        registry.subscribe(&id("carol"), &id("bob")).await.unwrap();

        assert_eq!(
            registry.resolve_publishers(&id("alice")),
            HashSet::from([id("bob"), id("diana")])
        );
        assert!(registry.resolve_publishers(&id("bob")).is_empty());
    }

    #[tokio::test]
    async fn unknown_publisher_has_no_subscribers() {
        let registry = empty_registry().await;
        assert!(registry.resolve_subscribers(&id("nobody")).is_empty());
    }

    #[tokio::test]
    async fn load_rebuilds_index_from_store() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        store
            .add(&Subscription::new(id("s1"), id("p1")))
            .await
            .unwrap();
        store
            .add(&Subscription::new(id("s2"), id("p1")))
            .await
            .unwrap();
        store
            .add(&Subscription::new(id("s1"), id("p2")))
            .await
            .unwrap();

        let registry = SubscriptionRegistry::load(store).await.unwrap();

        assert_eq!(
            registry.stats(),
            RegistryStats {
                edges: 3,
                publishers: 2,
                subscribers: 2,
            }
        );
        assert!(registry.is_subscribed(&id("s1"), &id("p2")));
    }

    #[tokio::test]
    async fn reload_picks_up_external_changes() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let registry = SubscriptionRegistry::load(Arc::clone(&store)).await.unwrap();

        store
            .add(&Subscription::new(id("s1"), id("p")))
            .await
            .unwrap();
        assert!(registry.resolve_subscribers(&id("p")).is_empty());

        let loaded = registry.reload().await.unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(registry.resolve_subscribers(&id("p")), HashSet::from([id("s1")]));
    }

    #[tokio::test]
    async fn failed_store_write_does_not_touch_index() {
        let mut store = MockSubscriptionStore::new();
        store.expect_list_all().returning(|| Ok(vec![]));
        store
            .expect_add()
            .times(1)
            .returning(|_| Err(RepositoryError::storage("disk full")));

        let registry = SubscriptionRegistry::load(Arc::new(store)).await.unwrap();
        let err = registry.subscribe(&id("s1"), &id("p")).await.unwrap_err();

        assert!(matches!(err, CoreError::Repository(_)));
        assert!(!registry.is_subscribed(&id("s1"), &id("p")));
    }

    #[tokio::test]
    async fn unsubscribe_writes_through_to_store() {
        let mut store = MockSubscriptionStore::new();
        store.expect_list_all().returning(|| {
            Ok(vec![Subscription::new(
                ProfileId::new("s1"),
                ProfileId::new("p"),
            )])
        });
        store
            .expect_remove()
            .withf(|s, p| s.as_str() == "s1" && p.as_str() == "p")
            .times(1)
            .returning(|_, _| Ok(()));

        let registry = SubscriptionRegistry::load(Arc::new(store)).await.unwrap();
        registry.unsubscribe(&id("s1"), &id("p")).await.unwrap();

        assert_eq!(registry.stats().edges, 0);
    }

    #[tokio::test]
    async fn get_subscribed_authors_reads_store() {
        let registry = empty_registry().await;
        registry.subscribe(&id("alice"), &id("bob")).await.unwrap();
        registry.subscribe(&id("alice"), &id("diana")).await.unwrap();

        let mut authors = registry.get_subscribed_authors(&id("alice")).await.unwrap();
        authors.sort();

        assert_eq!(authors, vec![id("bob"), id("diana")]);
    }

    #[tokio::test]
    async fn concurrent_duplicate_subscribes_create_one_edge() {
        let registry = Arc::new(empty_registry().await);

        let mut handles = vec![];
        for _ in 0..16 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry.subscribe(&id("s1"), &id("p")).await.is_ok()
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(registry.stats().edges, 1);
    }
}
