//! Social Core Binary
//!
//! Loads the subscription registry from Turso, wires the voting and
//! notification use cases, and serves health and metrics until shutdown.
//!
//! The binary exposes no request API. Posts, comments and profiles are owned
//! by the API layer that embeds this crate and passes its own repositories
//! to [`social_core::Container`]; here the container only backs the health
//! report and the notification relay.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin social-core
//! ```
//!
//! # Environment Variables
//!
//! - `SOCIAL_ENV`: development | production (default: development)
//! - `SOCIAL_DB_PATH`: Turso database file (default: ./data/social.db)
//! - `SOCIAL_HEALTH_PORT`: health and metrics HTTP port (default: 8083)
//! - `SOCIAL_NOTIFICATION_CAPACITY`: notification channel capacity (default: 1024)
//! - `SOCIAL_NOTIFY_ON_RETRACT`: notify when a vote is retracted (default: true)
//! - `OTEL_ENABLED`: enable OpenTelemetry (default: true)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: <http://localhost:4317>)
//! - `OTEL_SERVICE_NAME`: service name (default: social-core)
//! - `RUST_LOG`: log filter (default: info)

use std::sync::Arc;

use anyhow::Context;
use social_core::{
    BroadcastNotificationTransport, CoreConfig, HealthServer, HealthServerState,
    InMemoryProfileRepository, InMemoryTargetRepository, ServiceContainer, SubscriptionRegistry,
    TursoSubscriptionStore, init_metrics, init_telemetry,
};
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let _telemetry_guard = init_telemetry();

    tracing::info!("Starting social core");

    let _metrics_handle = init_metrics().context("failed to install metrics recorder")?;

    let config = CoreConfig::from_env().context("invalid configuration")?;
    log_config(&config);

    let store = TursoSubscriptionStore::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let registry = SubscriptionRegistry::load(Arc::new(store))
        .await
        .context("failed to load subscriptions")?;

    let transport = Arc::new(BroadcastNotificationTransport::new(
        config.notification_capacity,
    ));
    // Empty target and profile stores: no request API reaches the use cases.
    let container: Arc<ServiceContainer> = Arc::new(ServiceContainer::new(
        Arc::new(InMemoryTargetRepository::new()),
        Arc::new(InMemoryProfileRepository::new()),
        Arc::new(registry),
        Arc::clone(&transport),
        config.voting,
    ));

    let shutdown_token = CancellationToken::new();

    let health_state = Arc::new(HealthServerState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        container,
        shutdown_token.clone(),
    ));
    let health_server = HealthServer::new(config.health_port, health_state, shutdown_token.clone());
    tokio::spawn(async move {
        if let Err(e) = health_server.run().await {
            tracing::error!(error = %e, "Health server error");
        }
    });

    tokio::spawn(relay_notifications(transport, shutdown_token.clone()));

    tracing::info!("Social core ready");

    await_shutdown(shutdown_token).await;

    tracing::info!("Social core stopped");
    Ok(())
}

/// Log outgoing notifications until shutdown.
async fn relay_notifications(
    transport: Arc<BroadcastNotificationTransport>,
    shutdown_token: CancellationToken,
) {
    let mut rx = transport.subscribe();
    loop {
        tokio::select! {
            () = shutdown_token.cancelled() => break,
            received = rx.recv() => match received {
                Ok(envelope) => {
                    tracing::debug!(
                        recipient_id = %envelope.recipient_id,
                        message = %envelope.message,
                        "Notification relayed"
                    );
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notification relay lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
}

/// Log the parsed configuration.
fn log_config(config: &CoreConfig) {
    tracing::info!(
        environment = config.environment.as_str(),
        db_path = %config.db_path.display(),
        health_port = config.health_port,
        notification_capacity = config.notification_capacity,
        notify_on_retract = config.voting.notify_on_retract,
        "Configuration loaded"
    );
}

/// Load .env from the current directory or the nearest ancestor that has one.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
}
