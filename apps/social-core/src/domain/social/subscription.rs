//! Subscription edge.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{ProfileId, Timestamp};

/// Directed edge: `subscriber_id` follows `publisher_id`.
///
/// Edges are created and removed, never mutated. Identity is the
/// `(subscriber_id, publisher_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Profile receiving notifications.
    pub subscriber_id: ProfileId,
    /// Profile whose activity is followed.
    pub publisher_id: ProfileId,
    /// When the edge was created.
    pub subscribed_at: Timestamp,
}

impl Subscription {
    /// Create a new edge stamped with the current time.
    #[must_use]
    pub fn new(subscriber_id: ProfileId, publisher_id: ProfileId) -> Self {
        Self {
            subscriber_id,
            publisher_id,
            subscribed_at: Timestamp::now(),
        }
    }

    /// Whether this edge connects the given pair.
    #[must_use]
    pub fn connects(&self, subscriber_id: &ProfileId, publisher_id: &ProfileId) -> bool {
        &self.subscriber_id == subscriber_id && &self.publisher_id == publisher_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribed_at_is_not_in_the_future() {
        let sub = Subscription::new(ProfileId::new("alice"), ProfileId::new("bob"));
        assert!(sub.subscribed_at <= Timestamp::now());
    }

    #[test]
    fn connects_is_directional() {
        let sub = Subscription::new(ProfileId::new("alice"), ProfileId::new("bob"));
        assert!(sub.connects(&ProfileId::new("alice"), &ProfileId::new("bob")));
        assert!(!sub.connects(&ProfileId::new("bob"), &ProfileId::new("alice")));
    }
}
