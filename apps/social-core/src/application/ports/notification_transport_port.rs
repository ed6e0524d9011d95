//! Notification Transport Port (Driven Port)
//!
//! Delivers one message to one recipient. Retries, buffering and connection
//! handling belong to the transport, not the core.

use async_trait::async_trait;

use crate::domain::social::Profile;

/// Per-recipient delivery failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The recipient could not be reached.
    #[error("recipient unreachable: {message}")]
    Unreachable { message: String },

    /// The transport rejected the message.
    #[error("delivery rejected: {message}")]
    Rejected { message: String },
}

/// Port for delivering notifications to a single profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Send `message` to `recipient`.
    async fn send(&self, recipient: &Profile, message: &str) -> Result<(), TransportError>;
}
