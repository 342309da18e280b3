//! OpenTelemetry initialization and configuration
//!
//! Builds the tracer and meter providers exporting to an OTLP collector and
//! the `tracing` subscriber that bridges spans into them. Features graceful
//! degradation: a missing endpoint or a failing exporter turns the affected
//! signal into a no-op, and message processing carries on.

use std::{fmt, sync::Arc, time::Duration};

use application::TelemetryPort;
use domain::ServiceResource;
use opentelemetry::{
    KeyValue, global,
    metrics::MeterProvider as _,
    trace::TracerProvider as _,
};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    metrics::{PeriodicReader, SdkMeterProvider},
    propagation::TraceContextPropagator,
    trace::{Sampler, SdkTracerProvider},
};
use serde::{Deserialize, Serialize};
use tracing::{Subscriber, error, info, warn};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{
    EnvFilter, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};

use super::counters::CounterRegistry;
use crate::adapters::OtelTelemetryAdapter;

/// Instrumentation scope name of the tracer
pub const TRACER_NAME: &str = "kbot";

/// Instrumentation scope name of the meter
pub const METER_NAME: &str = "kbot_counter";

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human-readable multi-line output
    Pretty,
}

/// Configuration for telemetry export and logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// OTLP collector address, e.g. `otel-collector:4317`
    ///
    /// When absent, traces and metrics are not exported.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Metric export interval in seconds
    #[serde(default = "default_export_interval")]
    pub export_interval_secs: u64,

    /// Exporter request timeout in seconds
    #[serde(default = "default_export_timeout")]
    pub export_timeout_secs: u64,

    /// Log level filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Log line format
    #[serde(default)]
    pub log_format: LogFormat,
}

const fn default_export_interval() -> u64 {
    10
}

const fn default_export_timeout() -> u64 {
    10
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            export_interval_secs: default_export_interval(),
            export_timeout_secs: default_export_timeout(),
            log_filter: default_log_filter(),
            log_format: LogFormat::default(),
        }
    }
}

/// Prefix a bare `host:port` with `http://`
///
/// Returns `None` for blank input.
pub fn normalize_endpoint(raw: &str) -> Option<String> {
    let endpoint = raw.trim();
    if endpoint.is_empty() {
        None
    } else if endpoint.contains("://") {
        Some(endpoint.to_string())
    } else {
        Some(format!("http://{endpoint}"))
    }
}

/// State of one telemetry signal after configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalStatus {
    /// No endpoint configured
    Disabled,
    /// Exporting to the collector
    Exporting,
    /// Exporter could not be built; the signal is a no-op
    Degraded(String),
}

impl SignalStatus {
    /// Whether the signal is exported
    pub const fn is_exporting(&self) -> bool {
        matches!(self, Self::Exporting)
    }
}

/// Outcome of [`TelemetryProvider::configure`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryStatus {
    /// Normalized collector endpoint, if configured
    pub endpoint: Option<String>,
    /// Trace export state
    pub traces: SignalStatus,
    /// Metric export state
    pub metrics: SignalStatus,
}

impl TelemetryStatus {
    /// Status with both signals disabled
    pub const fn disabled() -> Self {
        Self {
            endpoint: None,
            traces: SignalStatus::Disabled,
            metrics: SignalStatus::Disabled,
        }
    }

    /// Write the status to the log
    ///
    /// Called once the subscriber is installed, so degradations found while
    /// configuring are not lost.
    pub fn log(&self) {
        let Some(endpoint) = self.endpoint.as_deref() else {
            warn!("METRICS_HOST not set, traces and metrics are not exported");
            return;
        };

        for (signal, status) in [("traces", &self.traces), ("metrics", &self.metrics)] {
            match status {
                SignalStatus::Exporting => {
                    info!(signal, endpoint, "Exporting to OTLP collector");
                },
                SignalStatus::Degraded(reason) => {
                    warn!(signal, endpoint, error = %reason, "OTLP exporter unavailable, signal disabled");
                },
                SignalStatus::Disabled => {},
            }
        }
    }
}

/// Tracer and meter providers for the bot
///
/// Constructed once at startup and injected where needed; nothing is
/// registered as a global tracer or meter provider.
pub struct TelemetryProvider {
    service_name: String,
    tracer_provider: Option<SdkTracerProvider>,
    meter_provider: SdkMeterProvider,
    counters: Arc<CounterRegistry>,
    status: TelemetryStatus,
}

impl fmt::Debug for TelemetryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelemetryProvider")
            .field("service_name", &self.service_name)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl TelemetryProvider {
    /// Build providers for the configured endpoint
    ///
    /// Never fails. Without an endpoint both signals are no-ops; an exporter
    /// that cannot be built disables only its own signal.
    pub fn configure(config: &TelemetryConfig, service: &ServiceResource) -> Self {
        let resource = build_resource(service);

        let Some(endpoint) = config.endpoint.as_deref().and_then(normalize_endpoint) else {
            return Self::from_providers(
                service,
                None,
                noop_meter_provider(resource),
                TelemetryStatus::disabled(),
            );
        };

        let timeout = Duration::from_secs(config.export_timeout_secs);
        let interval = Duration::from_secs(config.export_interval_secs);

        let (tracer_provider, traces) =
            match build_tracer_provider(&endpoint, timeout, resource.clone()) {
                Ok(provider) => (Some(provider), SignalStatus::Exporting),
                Err(reason) => (None, SignalStatus::Degraded(reason)),
            };

        let (meter_provider, metrics) =
            match build_meter_provider(&endpoint, timeout, interval, resource.clone()) {
                Ok(provider) => (provider, SignalStatus::Exporting),
                Err(reason) => (noop_meter_provider(resource), SignalStatus::Degraded(reason)),
            };

        let status = TelemetryStatus {
            endpoint: Some(endpoint),
            traces,
            metrics,
        };
        Self::from_providers(service, tracer_provider, meter_provider, status)
    }

    /// Assemble a provider from already built SDK providers
    ///
    /// Lets callers plug in their own exporters.
    pub fn from_providers(
        service: &ServiceResource,
        tracer_provider: Option<SdkTracerProvider>,
        meter_provider: SdkMeterProvider,
        status: TelemetryStatus,
    ) -> Self {
        let counters = Arc::new(CounterRegistry::new(meter_provider.meter(METER_NAME)));
        Self {
            service_name: service.service_name().to_string(),
            tracer_provider,
            meter_provider,
            counters,
            status,
        }
    }

    /// Configuration outcome
    pub const fn status(&self) -> &TelemetryStatus {
        &self.status
    }

    /// `kbot_<version>` service name attached to every signal
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Shared per-payload counter registry
    pub fn counters(&self) -> Arc<CounterRegistry> {
        Arc::clone(&self.counters)
    }

    /// Telemetry port for the message pipeline
    pub fn port(&self) -> Arc<dyn TelemetryPort> {
        Arc::new(OtelTelemetryAdapter::new(
            self.counters(),
            self.service_name.clone(),
        ))
    }

    /// Build the `tracing` subscriber writing logs to `writer`
    ///
    /// The OpenTelemetry layer is only present when traces are exported;
    /// without it spans still open and close but produce no trace ids.
    pub fn subscriber<W>(
        &self,
        config: &TelemetryConfig,
        writer: W,
    ) -> impl Subscriber + Send + Sync + use<W>
    where
        W: for<'w> MakeWriter<'w> + Clone + Send + Sync + 'static,
    {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

        let (json_layer, pretty_layer) = match config.log_format {
            LogFormat::Json => (
                Some(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_current_span(false)
                        .with_span_list(false)
                        .with_writer(writer),
                ),
                None,
            ),
            LogFormat::Pretty => (
                None,
                Some(tracing_subscriber::fmt::layer().pretty().with_writer(writer)),
            ),
        };

        let otel_layer = self
            .tracer_provider
            .as_ref()
            .map(|provider| OpenTelemetryLayer::new(provider.tracer(TRACER_NAME)));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .with(pretty_layer)
            .with(otel_layer)
    }

    /// Guard flushing and shutting down both providers when dropped
    pub fn guard(&self) -> TelemetryGuard {
        TelemetryGuard {
            tracer_provider: self.tracer_provider.clone(),
            meter_provider: Some(self.meter_provider.clone()),
        }
    }
}

fn build_resource(service: &ServiceResource) -> Resource {
    Resource::builder_empty()
        .with_schema_url(
            [KeyValue::new("service.name", service.service_name().to_string())],
            service.schema_url().to_string(),
        )
        .build()
}

fn noop_meter_provider(resource: Resource) -> SdkMeterProvider {
    SdkMeterProvider::builder().with_resource(resource).build()
}

fn build_tracer_provider(
    endpoint: &str,
    timeout: Duration,
    resource: Resource,
) -> Result<SdkTracerProvider, String> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .with_timeout(timeout)
        .build()
        .map_err(|e| e.to_string())?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(resource)
        .build())
}

fn build_meter_provider(
    endpoint: &str,
    timeout: Duration,
    interval: Duration,
    resource: Resource,
) -> Result<SdkMeterProvider, String> {
    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .with_timeout(timeout)
        .build()
        .map_err(|e| e.to_string())?;

    let reader = PeriodicReader::builder(exporter)
        .with_interval(interval)
        .build();

    Ok(SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(resource)
        .build())
}

/// Guard that shuts down the tracer and meter providers when dropped
///
/// Pending spans and metrics are flushed on shutdown.
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
    meter_provider: Option<SdkMeterProvider>,
}

impl fmt::Debug for TelemetryGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelemetryGuard")
            .field("traces", &self.tracer_provider.is_some())
            .field("metrics", &self.meter_provider.is_some())
            .finish()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            error!(error = %e, "Failed to shutdown tracer provider");
        }
        if let Some(provider) = self.meter_provider.take()
            && let Err(e) = provider.shutdown()
        {
            error!(error = %e, "Failed to shutdown meter provider");
        }
    }
}

/// Install the global subscriber and the W3C trace context propagator
///
/// Logs go to stdout. The configuration status is logged right after the
/// subscriber is installed. Keep the returned guard alive for the lifetime
/// of the process.
pub fn init_telemetry(
    provider: &TelemetryProvider,
    config: &TelemetryConfig,
) -> Result<TelemetryGuard, TelemetryError> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    provider
        .subscriber(config, std::io::stdout)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))?;

    provider.status().log();
    Ok(provider.guard())
}

/// Error type for telemetry initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to install the tracing subscriber
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ServiceResource {
        ServiceResource::new("1.2.0").unwrap()
    }

    #[test]
    fn config_default() {
        let config = TelemetryConfig::default();
        assert!(config.endpoint.is_none());
        assert_eq!(config.export_interval_secs, 10);
        assert_eq!(config.export_timeout_secs, 10);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let json = r#"{"endpoint": "collector:4317", "log_format": "pretty"}"#;
        let parsed: TelemetryConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.endpoint.as_deref(), Some("collector:4317"));
        assert_eq!(parsed.log_format, LogFormat::Pretty);
        assert_eq!(parsed.export_interval_secs, 10);
        assert_eq!(parsed.log_filter, "info");
    }

    #[test]
    fn normalize_endpoint_adds_scheme() {
        assert_eq!(
            normalize_endpoint("collector:4317").as_deref(),
            Some("http://collector:4317")
        );
        assert_eq!(
            normalize_endpoint(" https://collector:4317 ").as_deref(),
            Some("https://collector:4317")
        );
        assert!(normalize_endpoint("").is_none());
        assert!(normalize_endpoint("   ").is_none());
    }

    #[test]
    fn no_endpoint_disables_both_signals() {
        let provider = TelemetryProvider::configure(&TelemetryConfig::default(), &service());
        assert_eq!(provider.status(), &TelemetryStatus::disabled());
        assert_eq!(provider.service_name(), "kbot_1.2.0");
    }

    #[test]
    fn blank_endpoint_is_treated_as_absent() {
        let config = TelemetryConfig {
            endpoint: Some("  ".to_string()),
            ..TelemetryConfig::default()
        };
        let provider = TelemetryProvider::configure(&config, &service());
        assert!(provider.status().endpoint.is_none());
    }

    #[tokio::test]
    async fn invalid_endpoint_degrades_both_signals() {
        let config = TelemetryConfig {
            endpoint: Some("not a uri".to_string()),
            ..TelemetryConfig::default()
        };
        let provider = TelemetryProvider::configure(&config, &service());

        assert!(matches!(provider.status().traces, SignalStatus::Degraded(_)));
        assert!(matches!(provider.status().metrics, SignalStatus::Degraded(_)));
        assert!(!provider.status().traces.is_exporting());
    }

    #[test]
    fn counters_work_without_export() {
        let provider = TelemetryProvider::configure(&TelemetryConfig::default(), &service());
        let counters = provider.counters();
        counters.increment(&domain::CounterName::for_payload(&domain::Payload::new("hello")));
        assert_eq!(provider.counters().value("kbot_hello"), Some(1));
    }

    #[test]
    fn guard_drop_without_export_does_not_panic() {
        let provider = TelemetryProvider::configure(&TelemetryConfig::default(), &service());
        let guard = provider.guard();
        assert!(format!("{guard:?}").contains("traces: false"));
        drop(guard);
    }

    #[test]
    fn error_display() {
        let err = TelemetryError::Init("already set".to_string());
        assert_eq!(err.to_string(), "Failed to initialize tracing: already set");
    }
}
