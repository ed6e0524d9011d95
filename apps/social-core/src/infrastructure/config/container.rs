//! Dependency Injection Container
//!
//! Builds the registry, dispatcher and use cases once and shares them.
//! Use cases own their per-key locks, so callers must go through the shared
//! instances rather than constructing new ones.

use std::sync::Arc;

use crate::application::ports::{
    NotificationTransport, ProfileRepository, SubscriptionStore, TargetRepository,
};
use crate::application::services::{NotificationDispatcher, RegistryStats, SubscriptionRegistry};
use crate::application::use_cases::{
    AuthorshipUseCase, CommentNotificationUseCase, VotingPolicy, VotingUseCase,
};
use crate::infrastructure::health::HealthSource;
use crate::infrastructure::notification::BroadcastNotificationTransport;
use crate::infrastructure::persistence::{
    InMemoryProfileRepository, InMemoryTargetRepository, TursoSubscriptionStore,
};

type Dispatcher<S, P, T> = NotificationDispatcher<S, P, T>;

/// Container wired with the adapters the service binary ships.
pub type ServiceContainer = Container<
    InMemoryTargetRepository,
    InMemoryProfileRepository,
    TursoSubscriptionStore,
    BroadcastNotificationTransport,
>;

/// Dependency injection container.
pub struct Container<R, P, S, T>
where
    R: TargetRepository + 'static,
    P: ProfileRepository + 'static,
    S: SubscriptionStore + 'static,
    T: NotificationTransport + 'static,
{
    // Ports
    transport: Arc<T>,

    // Services
    registry: Arc<SubscriptionRegistry<S>>,

    // Use cases
    voting: Arc<VotingUseCase<R, P, Dispatcher<S, P, T>>>,
    comments: Arc<CommentNotificationUseCase<R, P, Dispatcher<S, P, T>>>,
    authorship: Arc<AuthorshipUseCase<R>>,
}

impl<R, P, S, T> Container<R, P, S, T>
where
    R: TargetRepository + 'static,
    P: ProfileRepository + 'static,
    S: SubscriptionStore + 'static,
    T: NotificationTransport + 'static,
{
    /// Wire every component from the given ports and loaded registry.
    pub fn new(
        targets: Arc<R>,
        profiles: Arc<P>,
        registry: Arc<SubscriptionRegistry<S>>,
        transport: Arc<T>,
        policy: VotingPolicy,
    ) -> Self {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::clone(&registry),
            Arc::clone(&profiles),
            Arc::clone(&transport),
        ));

        let voting = Arc::new(VotingUseCase::new(
            Arc::clone(&targets),
            Arc::clone(&profiles),
            Arc::clone(&dispatcher),
            policy,
        ));
        let comments = Arc::new(CommentNotificationUseCase::new(
            Arc::clone(&targets),
            profiles,
            dispatcher,
        ));
        let authorship = Arc::new(AuthorshipUseCase::new(targets));

        Self {
            transport,
            registry,
            voting,
            comments,
            authorship,
        }
    }

    /// Get the notification transport.
    pub fn transport(&self) -> Arc<T> {
        Arc::clone(&self.transport)
    }

    /// Get the subscription registry.
    pub fn registry(&self) -> Arc<SubscriptionRegistry<S>> {
        Arc::clone(&self.registry)
    }

    /// Get the shared `VotingUseCase`.
    pub fn voting(&self) -> Arc<VotingUseCase<R, P, Dispatcher<S, P, T>>> {
        Arc::clone(&self.voting)
    }

    /// Get the shared `CommentNotificationUseCase`.
    pub fn comments(&self) -> Arc<CommentNotificationUseCase<R, P, Dispatcher<S, P, T>>> {
        Arc::clone(&self.comments)
    }

    /// Get the shared `AuthorshipUseCase`.
    pub fn authorship(&self) -> Arc<AuthorshipUseCase<R>> {
        Arc::clone(&self.authorship)
    }
}

impl<R, P, S> HealthSource for Container<R, P, S, BroadcastNotificationTransport>
where
    R: TargetRepository + 'static,
    P: ProfileRepository + 'static,
    S: SubscriptionStore + 'static,
{
    fn registry_stats(&self) -> RegistryStats {
        self.registry.stats()
    }

    fn notification_receivers(&self) -> usize {
        self.transport.receiver_count()
    }
}
