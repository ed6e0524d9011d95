//! Observability: structured logging, OpenTelemetry export and Prometheus
//! metrics.

mod metrics;
pub mod telemetry;

pub use metrics::{
    MetricsError, SubscriptionChange, get_metrics_handle, init_metrics, record_dispatch,
    record_notification_failed, record_notification_sent, record_subscription_change,
    record_vote_applied, set_subscription_count,
};
pub use telemetry::{TelemetryConfig, TelemetryGuard};
