//! Author Notifier Port
//!
//! What use cases call when an author's content sees activity. The
//! notification dispatcher is the production implementation.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::social::Profile;

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    /// Subscribers a delivery was attempted for.
    pub attempted: usize,
    /// Deliveries the transport accepted.
    pub delivered: usize,
    /// Deliveries that failed (logged and dropped).
    pub failed: usize,
}

impl DispatchReport {
    /// Whether every attempted delivery succeeded.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Fans a message out to everyone subscribed to `publisher`.
///
/// Never fails: per-recipient errors are absorbed into the report.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorNotifier: Send + Sync {
    /// Notify all subscribers of `publisher`.
    async fn notify(&self, publisher: &Profile, message: &str) -> DispatchReport;
}
