//! Tracing and OpenTelemetry setup.
//!
//! # Environment Variables
//!
//! - `OTEL_ENABLED`: set to "false" to log to the console only (default: true)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP gRPC endpoint (default: http://localhost:4317)
//! - `OTEL_SERVICE_NAME`: service name for traces (default: social-core)
//! - `RUST_LOG`: extra filter directives

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_SERVICE_NAME: &str = "social-core";

const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4317";

/// Shuts down the tracer provider on drop.
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to shutdown OpenTelemetry tracer provider: {e}");
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Whether spans are exported over OTLP.
    pub enabled: bool,
    /// OTLP exporter endpoint.
    pub otlp_endpoint: String,
    /// Service name attached to exported spans.
    pub service_name: String,
    /// ANSI colours and no targets in console output.
    pub pretty_console: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            otlp_endpoint: DEFAULT_OTLP_ENDPOINT.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            pretty_console: false,
        }
    }
}

impl TelemetryConfig {
    /// Read configuration from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let enabled = std::env::var("OTEL_ENABLED")
            .map(|v| !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        let otlp_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_OTLP_ENDPOINT.to_string());

        let service_name =
            std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());

        let pretty_console = std::env::var("SOCIAL_ENV")
            .map(|v| v.eq_ignore_ascii_case("development"))
            .unwrap_or(true);

        Self {
            enabled,
            otlp_endpoint,
            service_name,
            pretty_console,
        }
    }
}

/// Initialize tracing from the environment.
///
/// The returned guard must be kept alive for the life of the process.
#[must_use]
pub fn init() -> TelemetryGuard {
    init_with_config(&TelemetryConfig::from_env())
}

/// Initialize tracing with an explicit configuration.
#[must_use]
#[allow(clippy::expect_used)]
pub fn init_with_config(config: &TelemetryConfig) -> TelemetryGuard {
    let env_filter = EnvFilter::from_default_env()
        .add_directive(
            "social_core=info"
                .parse()
                .expect("static directive 'social_core=info' is valid"),
        )
        .add_directive(
            "tower_http=info"
                .parse()
                .expect("static directive 'tower_http=info' is valid"),
        )
        .add_directive(
            "hyper=warn"
                .parse()
                .expect("static directive 'hyper=warn' is valid"),
        );

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(!config.pretty_console)
        .with_ansi(config.pretty_console);

    if !config.enabled {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();

        tracing::info!("OpenTelemetry disabled, using console logging only");
        return TelemetryGuard {
            tracer_provider: None,
        };
    }

    let exporter = match opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.otlp_endpoint)
        .build()
    {
        Ok(exporter) => exporter,
        Err(e) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .init();

            tracing::warn!(error = %e, "Failed to create OTLP exporter, using console logging only");
            return TelemetryGuard {
                tracer_provider: None,
            };
        }
    };

    let tracer_provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(
            opentelemetry_sdk::Resource::builder()
                .with_service_name(config.service_name.clone())
                .build(),
        )
        .build();

    let tracer = tracer_provider.tracer(config.service_name.clone());
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .init();

    tracing::info!(
        service_name = %config.service_name,
        endpoint = %config.otlp_endpoint,
        "OpenTelemetry initialized"
    );

    TelemetryGuard {
        tracer_provider: Some(tracer_provider),
    }
}
