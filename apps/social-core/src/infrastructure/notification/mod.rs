//! Broadcast Notification Transport
//!
//! Publishes each delivery as a [`NotificationEnvelope`] on a tokio broadcast
//! channel. The real-time layer holds receivers and relays envelopes to the
//! connected recipients.
//!
//! Having no receivers is not a delivery failure: nobody is connected to
//! relay to, and the envelope is dropped.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::application::ports::{NotificationTransport, TransportError};
use crate::domain::shared::{ProfileId, Timestamp};
use crate::domain::social::Profile;

/// Default channel capacity.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Largest channel capacity accepted.
pub const MAX_CAPACITY: usize = 1 << 20;

/// One message addressed to one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    /// Profile the message is for.
    pub recipient_id: ProfileId,
    /// Human-readable message.
    pub message: String,
    /// When the envelope was published.
    pub sent_at: Timestamp,
}

/// [`NotificationTransport`] over a `tokio::sync::broadcast` channel.
#[derive(Debug, Clone)]
pub struct BroadcastNotificationTransport {
    tx: broadcast::Sender<NotificationEnvelope>,
}

impl BroadcastNotificationTransport {
    /// Create a transport whose channel buffers up to `capacity` envelopes.
    ///
    /// The capacity is clamped to `1..=MAX_CAPACITY`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.clamp(1, MAX_CAPACITY));
        Self { tx }
    }

    /// Create a transport with [`DEFAULT_CAPACITY`].
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Get a new receiver for published envelopes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEnvelope> {
        self.tx.subscribe()
    }

    /// Number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastNotificationTransport {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl NotificationTransport for BroadcastNotificationTransport {
    async fn send(&self, recipient: &Profile, message: &str) -> Result<(), TransportError> {
        let envelope = NotificationEnvelope {
            recipient_id: recipient.id.clone(),
            message: message.to_string(),
            sent_at: Timestamp::now(),
        };

        if self.tx.send(envelope).is_err() {
            tracing::trace!(recipient_id = %recipient.id, "No notification receivers connected");
        }
        Ok(())
    }
}
