use anyhow::Result;
use opentelemetry::{KeyValue, global, trace::TracerProvider as _};
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{LogExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    self as sdk,
    logs::{SdkLogger, SdkLoggerProvider},
    resource::Resource,
};
use tracing::{info, warn};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

type TraceLayer = OpenTelemetryLayer<Registry, sdk::trace::Tracer>;
type LogLayer = OpenTelemetryTracingBridge<SdkLoggerProvider, SdkLogger>;

/// Owns the OTLP providers for the process lifetime and flushes them on drop.
/// The JSON stdout subscriber is always installed; trace and log export are
/// each added only when an endpoint is configured and the signal is enabled.
pub struct TelemetryGuard {
    tracer_provider: Option<sdk::trace::SdkTracerProvider>,
    logger_provider: Option<SdkLoggerProvider>,
}

impl TelemetryGuard {
    pub fn init(config: &AppConfig) -> Result<Self> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.log.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .json();

        let endpoint = configured_endpoint(config);

        let mut trace_layer: Option<TraceLayer> = None;
        let mut tracer_provider = None;
        if let Some(endpoint) = &endpoint {
            if !config.otel.disable_traces {
                let (layer, provider) = trace_pipeline(config, endpoint)?;
                trace_layer = Some(layer);
                tracer_provider = Some(provider);
            }
        }

        let mut log_layer: Option<LogLayer> = None;
        let mut logger_provider = None;
        if let Some(endpoint) = &endpoint {
            if !config.otel.disable_logs {
                let (layer, provider) = log_pipeline(config, endpoint)?;
                log_layer = Some(layer);
                logger_provider = Some(provider);
            }
        }

        tracing_subscriber::registry()
            .with(trace_layer)
            .with(log_layer)
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;

        if tracer_provider.is_some() || logger_provider.is_some() {
            info!("OpenTelemetry export enabled (json stdout retained)");
        }

        Ok(Self {
            tracer_provider,
            logger_provider,
        })
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(err) = provider.shutdown() {
                warn!(error = ?err, "failed to shutdown tracer provider cleanly");
            }
        }
        if let Some(provider) = self.logger_provider.take() {
            if let Err(err) = provider.shutdown() {
                warn!(error = ?err, "failed to shutdown logger provider cleanly");
            }
        }
    }
}

fn configured_endpoint(config: &AppConfig) -> Option<String> {
    match &config.otel.endpoint {
        Some(endpoint) if !endpoint.trim().is_empty() => Some(endpoint.clone()),
        _ => None,
    }
}

fn service_resource(config: &AppConfig) -> Resource {
    Resource::builder()
        .with_service_name(config.otel.service_name.clone())
        .with_attribute(KeyValue::new(
            "deployment.environment.name",
            config.environment.clone(),
        ))
        .build()
}

fn trace_pipeline(
    config: &AppConfig,
    endpoint: &str,
) -> Result<(TraceLayer, sdk::trace::SdkTracerProvider)> {
    let exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = sdk::trace::SdkTracerProvider::builder()
        .with_resource(service_resource(config))
        .with_batch_exporter(exporter)
        .build();

    let tracer = provider.tracer(config.otel.service_name.clone());
    global::set_tracer_provider(provider.clone());

    Ok((tracing_opentelemetry::layer().with_tracer(tracer), provider))
}

fn log_pipeline(config: &AppConfig, endpoint: &str) -> Result<(LogLayer, SdkLoggerProvider)> {
    let exporter = LogExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = SdkLoggerProvider::builder()
        .with_resource(service_resource(config))
        .with_batch_exporter(exporter)
        .build();

    let layer = OpenTelemetryTracingBridge::new(&provider);

    Ok((layer, provider))
}
