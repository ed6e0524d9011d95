//! Error taxonomy for the social core.
//!
//! | Variant | Reason | Raised by |
//! |---------|--------|-----------|
//! | `TargetNotFound` | `TARGET_NOT_FOUND` | vote, comment announcement, authorship check |
//! | `ProfileNotFound` | `PROFILE_NOT_FOUND` | author lookup after a vote |
//! | `AlreadySubscribed` | `ALREADY_SUBSCRIBED` | subscribe |
//! | `SubscriptionNotFound` | `SUBSCRIPTION_NOT_FOUND` | unsubscribe |
//! | `NotAuthor` | `NOT_AUTHOR` | authorship check |
//! | `Repository` | `REPOSITORY_ERROR` | any adapter fault |
//!
//! Delivery failures are absent: they are
//! [`TransportError`](crate::application::ports::TransportError)s and stop at
//! the notification dispatcher.

use thiserror::Error;

use super::shared::{ProfileId, TargetId};
use super::voting::TargetKind;

/// Errors surfaced by the core's public operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The post or comment does not exist.
    #[error("{kind} not found: {target_id}")]
    TargetNotFound {
        /// Kind of target that was looked up.
        kind: TargetKind,
        /// Target identifier.
        target_id: TargetId,
    },

    /// A referenced profile does not exist.
    #[error("profile not found: {profile_id}")]
    ProfileNotFound {
        /// Profile identifier.
        profile_id: ProfileId,
    },

    /// The subscriber already follows the publisher.
    #[error("{subscriber_id} is already subscribed to {publisher_id}")]
    AlreadySubscribed {
        /// Subscriber profile.
        subscriber_id: ProfileId,
        /// Publisher profile.
        publisher_id: ProfileId,
    },

    /// No subscription edge exists for the pair.
    #[error("subscription not found: {subscriber_id} -> {publisher_id}")]
    SubscriptionNotFound {
        /// Subscriber profile.
        subscriber_id: ProfileId,
        /// Publisher profile.
        publisher_id: ProfileId,
    },

    /// The user is not the author of the target they tried to change.
    #[error("{user_id} is not the author of {target_id}")]
    NotAuthor {
        /// User attempting the change.
        user_id: ProfileId,
        /// Target being changed.
        target_id: TargetId,
    },

    /// A storage adapter failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CoreError {
    /// Stable reason string for API layers.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TargetNotFound { .. } => "TARGET_NOT_FOUND",
            Self::ProfileNotFound { .. } => "PROFILE_NOT_FOUND",
            Self::AlreadySubscribed { .. } => "ALREADY_SUBSCRIBED",
            Self::SubscriptionNotFound { .. } => "SUBSCRIPTION_NOT_FOUND",
            Self::NotAuthor { .. } => "NOT_AUTHOR",
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Whether the error is a missing-entity lookup failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TargetNotFound { .. }
                | Self::ProfileNotFound { .. }
                | Self::SubscriptionNotFound { .. }
        )
    }
}

/// Faults raised by persistence adapters.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The backing store rejected or failed the operation.
    #[error("storage error: {message}")]
    Storage {
        /// Adapter-provided detail.
        message: String,
    },

    /// A stored row could not be decoded.
    #[error("corrupt row in {table}: {message}")]
    Corrupt {
        /// Table or collection name.
        table: &'static str,
        /// Decode failure detail.
        message: String,
    },
}

impl RepositoryError {
    /// Build a storage error from any displayable source.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage {
            message: err.to_string(),
        }
    }
}
