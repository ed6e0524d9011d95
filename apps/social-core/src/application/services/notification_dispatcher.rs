//! Notification Dispatcher
//!
//! Fans a message out to every subscriber of a publisher. Delivery is best
//! effort: each recipient is attempted independently and concurrently, and a
//! failure for one recipient never affects the others or the caller.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::future::join_all;

use super::subscription_registry::SubscriptionRegistry;
use crate::application::ports::{
    AuthorNotifier, DispatchReport, NotificationTransport, ProfileRepository, SubscriptionStore,
};
use crate::domain::shared::ProfileId;
use crate::domain::social::Profile;
use crate::observability::{record_dispatch, record_notification_failed, record_notification_sent};

/// Why a single delivery did not happen.
#[derive(Debug)]
enum DeliveryFailure {
    MissingProfile,
    Lookup(String),
    Transport(String),
}

impl DeliveryFailure {
    const fn reason(&self) -> &'static str {
        match self {
            Self::MissingProfile => "missing_profile",
            Self::Lookup(_) => "profile_lookup",
            Self::Transport(_) => "transport",
        }
    }

    fn detail(&self) -> &str {
        match self {
            Self::MissingProfile => "subscriber profile not found",
            Self::Lookup(message) | Self::Transport(message) => message,
        }
    }
}

/// Best-effort fan-out over a [`NotificationTransport`].
pub struct NotificationDispatcher<S, P, T>
where
    S: SubscriptionStore,
    P: ProfileRepository,
    T: NotificationTransport,
{
    registry: Arc<SubscriptionRegistry<S>>,
    profiles: Arc<P>,
    transport: Arc<T>,
}

impl<S, P, T> NotificationDispatcher<S, P, T>
where
    S: SubscriptionStore,
    P: ProfileRepository,
    T: NotificationTransport,
{
    /// Create a dispatcher.
    pub fn new(
        registry: Arc<SubscriptionRegistry<S>>,
        profiles: Arc<P>,
        transport: Arc<T>,
    ) -> Self {
        Self {
            registry,
            profiles,
            transport,
        }
    }

    async fn deliver(
        &self,
        recipient_id: ProfileId,
        message: &str,
    ) -> Result<(), (ProfileId, DeliveryFailure)> {
        let recipient = match self.profiles.get_by_id(&recipient_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => return Err((recipient_id, DeliveryFailure::MissingProfile)),
            Err(e) => return Err((recipient_id, DeliveryFailure::Lookup(e.to_string()))),
        };

        self.transport
            .send(&recipient, message)
            .await
            .map_err(|e| (recipient_id, DeliveryFailure::Transport(e.to_string())))
    }
}

#[async_trait]
impl<S, P, T> AuthorNotifier for NotificationDispatcher<S, P, T>
where
    S: SubscriptionStore,
    P: ProfileRepository,
    T: NotificationTransport,
{
    async fn notify(&self, publisher: &Profile, message: &str) -> DispatchReport {
        let recipients = self.registry.resolve_subscribers(&publisher.id);
        if recipients.is_empty() {
            tracing::debug!(publisher_id = %publisher.id, "No subscribers to notify");
            return DispatchReport::default();
        }

        let start = Instant::now();
        let attempted = recipients.len();
        let results = join_all(
            recipients
                .into_iter()
                .map(|recipient_id| self.deliver(recipient_id, message)),
        )
        .await;

        let mut report = DispatchReport {
            attempted,
            ..DispatchReport::default()
        };
        for result in results {
            match result {
                Ok(()) => {
                    report.delivered += 1;
                    record_notification_sent();
                }
                Err((recipient_id, failure)) => {
                    report.failed += 1;
                    record_notification_failed(failure.reason());
                    tracing::warn!(
                        publisher_id = %publisher.id,
                        recipient_id = %recipient_id,
                        reason = failure.reason(),
                        error = failure.detail(),
                        "Notification delivery failed"
                    );
                }
            }
        }

        record_dispatch(start.elapsed());
        tracing::debug!(
            publisher_id = %publisher.id,
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            "Notification dispatched"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::application::ports::{MockNotificationTransport, TransportError};
    use crate::domain::errors::RepositoryError;
    use crate::infrastructure::persistence::{InMemoryProfileRepository, InMemorySubscriptionStore};

    async fn registry_with(
        publisher: &str,
        subscribers: &[&str],
    ) -> Arc<SubscriptionRegistry<InMemorySubscriptionStore>> {
        let registry = SubscriptionRegistry::load(Arc::new(InMemorySubscriptionStore::new()))
            .await
            .unwrap();
        for sub in subscribers {
            registry
                .subscribe(&ProfileId::new(*sub), &ProfileId::new(publisher))
                .await
                .unwrap();
        }
        Arc::new(registry)
    }

    fn profiles(names: &[&str]) -> Arc<InMemoryProfileRepository> {
        let repo = InMemoryProfileRepository::new();
        for name in names {
            repo.insert(Profile::new(*name, *name));
        }
        Arc::new(repo)
    }

    /// Records every recipient; fails for ids listed in `failing`.
    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(ProfileId, String)>>,
        failing: Vec<&'static str>,
    }

    #[async_trait]
    impl NotificationTransport for RecordingTransport {
        async fn send(&self, recipient: &Profile, message: &str) -> Result<(), TransportError> {
            if self.failing.iter().any(|id| *id == recipient.id.as_str()) {
                return Err(TransportError::Unreachable {
                    message: "offline".to_string(),
                });
            }
            self.sent
                .lock()
                .push((recipient.id.clone(), message.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn delivers_to_every_subscriber() {
        let registry = registry_with("p", &["s1", "s2", "s3"]).await;
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher =
            NotificationDispatcher::new(registry, profiles(&["s1", "s2", "s3"]), Arc::clone(&transport));

        let report = dispatcher.notify(&Profile::new("p", "p"), "hello").await;

        assert_eq!(
            report,
            DispatchReport {
                attempted: 3,
                delivered: 3,
                failed: 0,
            }
        );
        let mut recipients: Vec<_> = transport
            .sent
            .lock()
            .iter()
            .map(|(id, msg)| {
                assert_eq!(msg, "hello");
                id.to_string()
            })
            .collect();
        recipients.sort();
        assert_eq!(recipients, vec!["s1", "s2", "s3"]);
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_rest() {
        let registry = registry_with("p", &["s1", "s2", "s3"]).await;
        let transport = Arc::new(RecordingTransport {
            failing: vec!["s2"],
            ..RecordingTransport::default()
        });
        let dispatcher =
            NotificationDispatcher::new(registry, profiles(&["s1", "s2", "s3"]), Arc::clone(&transport));

        let report = dispatcher.notify(&Profile::new("p", "p"), "hello").await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.is_complete());
        assert_eq!(transport.sent.lock().len(), 2);
    }

    #[tokio::test]
    async fn no_subscribers_sends_nothing() {
        let registry = registry_with("p", &[]).await;
        let mut transport = MockNotificationTransport::new();
        transport.expect_send().never();
        let dispatcher = NotificationDispatcher::new(registry, profiles(&[]), Arc::new(transport));

        let report = dispatcher.notify(&Profile::new("p", "p"), "hello").await;

        assert_eq!(report, DispatchReport::default());
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn missing_subscriber_profile_counts_as_failure() {
        let registry = registry_with("p", &["s1", "ghost"]).await;
        let mut transport = MockNotificationTransport::new();
        transport
            .expect_send()
            .withf(|recipient, _| recipient.id.as_str() == "s1")
            .times(1)
            .returning(|_, _| Ok(()));
        let dispatcher = NotificationDispatcher::new(registry, profiles(&["s1"]), Arc::new(transport));

        let report = dispatcher.notify(&Profile::new("p", "p"), "hello").await;

        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn profile_lookup_error_counts_as_failure() {
        use crate::application::ports::MockProfileRepository;

        let registry = registry_with("p", &["s1"]).await;
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_get_by_id()
            .returning(|_| Err(RepositoryError::storage("connection reset")));
        let mut transport = MockNotificationTransport::new();
        transport.expect_send().never();
        let dispatcher = NotificationDispatcher::new(registry, Arc::new(profiles), Arc::new(transport));

        let report = dispatcher.notify(&Profile::new("p", "p"), "hello").await;

        assert_eq!(report.attempted, 1);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn publisher_is_not_notified_of_own_activity_unless_subscribed() {
        let registry = registry_with("p", &["s1"]).await;
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = NotificationDispatcher::new(registry, profiles(&["p", "s1"]), Arc::clone(&transport));

        dispatcher.notify(&Profile::new("p", "p"), "hello").await;

        let sent = transport.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0.as_str(), "s1");
    }
}
