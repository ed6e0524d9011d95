#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::bool_assert_comparison
    )
)]

//! Social Core - Vote Ledger and Subscriber Fan-out
//!
//! The state-transition core of a social platform: how a user's vote on a
//! post or comment is added, flipped or retracted, and how activity on an
//! author's content is fanned out to everyone subscribed to that author.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Pure types and rules
//!   - `voting`: targets, votes, the vote ledger, the authorship guard
//!   - `social`: profiles and subscription edges
//!
//! - **Application**: Use cases, services and port definitions
//!   - `ports`: storage, profile lookup and notification transport
//!   - `services`: subscription registry, notification dispatcher
//!   - `use_cases`: voting, comment announcements, authorship checks
//!
//! - **Infrastructure**: Adapters and wiring
//!   - `persistence`: in-memory repositories, Turso subscription store
//!   - `notification`: broadcast-channel transport
//!   - `config`: environment configuration and dependency container
//!   - `health`: health, readiness and metrics endpoint
//!
//! # Data Flow
//!
//! ```text
//! apply_vote ──► VoteLedger ──► TargetRepository (insert / update / delete)
//!                    │
//!                    └──► author profile ──► NotificationDispatcher
//!                                               │
//!                         SubscriptionRegistry ◄┘
//!                                               │
//!                               NotificationTransport ──► subscriber 1..N
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core types with no I/O.
pub mod domain;

/// Application layer - Use cases, services and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and wiring.
pub mod infrastructure;

/// Logging, tracing export and metrics.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::errors::{CoreError, RepositoryError};
pub use domain::shared::{ProfileId, TargetId, Timestamp, VoteId};
pub use domain::social::{Profile, Subscription};
pub use domain::voting::{
    Target, TargetKind, Vote, VoteAction, VoteLedger, VoteOutcome, VoteTarget, ensure_author,
};

// Application
pub use application::ports::{
    AuthorNotifier, DispatchReport, NotificationTransport, ProfileRepository, SubscriptionStore,
    TargetRepository, TransportError,
};
pub use application::services::{NotificationDispatcher, RegistryStats, SubscriptionRegistry};
pub use application::use_cases::{
    AuthorshipUseCase, CommentNotificationUseCase, VotingPolicy, VotingUseCase,
};

// Infrastructure
pub use infrastructure::config::{ConfigError, Container, CoreConfig, Environment, ServiceContainer};
pub use infrastructure::health::{HealthServer, HealthServerError, HealthServerState, HealthSource};
pub use infrastructure::notification::{BroadcastNotificationTransport, NotificationEnvelope};
pub use infrastructure::persistence::{
    InMemoryProfileRepository, InMemorySubscriptionStore, InMemoryTargetRepository,
    TursoSubscriptionStore,
};

// Observability
pub use observability::{TelemetryConfig, TelemetryGuard, init_metrics};
pub use observability::telemetry::init as init_telemetry;
