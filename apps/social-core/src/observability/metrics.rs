//! Prometheus Metrics
//!
//! # Metrics
//!
//! - `social_core_votes_applied_total{kind,action}`
//! - `social_core_notifications_sent_total`
//! - `social_core_notifications_failed_total{reason}`
//! - `social_core_subscription_changes_total{change}`
//! - `social_core_subscriptions` (gauge)
//! - `social_core_dispatch_seconds` (histogram)
//!
//! Rendered at `/metrics` on the health server port. Recording before
//! [`init_metrics`] is a no-op.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::domain::voting::{TargetKind, VoteAction};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Error type for metrics setup.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to install the Prometheus recorder.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Install the Prometheus recorder and describe every metric.
///
/// Calling this again returns the already-installed handle.
///
/// # Errors
///
/// Returns [`MetricsError::Installation`] if another global recorder is
/// already installed.
pub fn init_metrics() -> Result<PrometheusHandle, MetricsError> {
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;
    register_metrics();

    Ok(PROMETHEUS_HANDLE.get_or_init(|| handle).clone())
}

/// Handle for rendering metrics, if initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

fn register_metrics() {
    describe_counter!(
        "social_core_votes_applied_total",
        "Votes applied, by target kind and resulting action"
    );
    describe_counter!(
        "social_core_notifications_sent_total",
        "Notifications accepted by the transport"
    );
    describe_counter!(
        "social_core_notifications_failed_total",
        "Notifications that could not be delivered"
    );
    describe_counter!(
        "social_core_subscription_changes_total",
        "Subscribe and unsubscribe operations"
    );
    describe_gauge!(
        "social_core_subscriptions",
        "Subscription edges in the registry"
    );
    describe_histogram!(
        "social_core_dispatch_seconds",
        "Time to fan a message out to all subscribers"
    );
}

/// Label for subscription changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionChange {
    /// An edge was added.
    Subscribe,
    /// An edge was removed.
    Unsubscribe,
}

impl SubscriptionChange {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
        }
    }
}

/// Record an applied vote.
pub fn record_vote_applied(kind: TargetKind, action: VoteAction) {
    counter!(
        "social_core_votes_applied_total",
        "kind" => kind.as_str(),
        "action" => action.as_str()
    )
    .increment(1);
}

/// Record a delivered notification.
pub fn record_notification_sent() {
    counter!("social_core_notifications_sent_total").increment(1);
}

/// Record a failed notification.
pub fn record_notification_failed(reason: &'static str) {
    counter!("social_core_notifications_failed_total", "reason" => reason).increment(1);
}

/// Record a subscription change.
pub fn record_subscription_change(change: SubscriptionChange) {
    counter!(
        "social_core_subscription_changes_total",
        "change" => change.as_str()
    )
    .increment(1);
}

/// Set the registry edge count.
#[allow(clippy::cast_precision_loss)]
pub fn set_subscription_count(count: usize) {
    gauge!("social_core_subscriptions").set(count as f64);
}

/// Record the duration of one fan-out.
pub fn record_dispatch(duration: Duration) {
    histogram!("social_core_dispatch_seconds").record(duration.as_secs_f64());
}
