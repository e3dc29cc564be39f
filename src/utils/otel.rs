//! Logging & Observability
//!
//! Installs the global tracing subscriber: a fmt layer filtered by
//! `RUST_LOG`, plus an OTLP span exporter when telemetry is enabled.

use opentelemetry::trace::TracerProvider;
use opentelemetry::{global, KeyValue};
use opentelemetry_sdk::{propagation::TraceContextPropagator, runtime, trace as sdktrace, Resource};
use std::error::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "story_backend=info,tower_http=info";

/// Flushes pending spans on drop
pub struct OtelGuard;

impl Drop for OtelGuard {
    fn drop(&mut self) {
        global::shutdown_tracer_provider();
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Register the global subscriber, with an OpenTelemetry layer when a tracer is given
fn install(tracer: Option<sdktrace::Tracer>) -> Result<(), Box<dyn Error + Send + Sync>> {
    Registry::default()
        .with(env_filter())
        .with(tracer.map(|t| tracing_opentelemetry::layer().with_tracer(t)))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()?;
    Ok(())
}

/// Console logging only
pub fn init_logging() -> Result<(), Box<dyn Error + Send + Sync>> {
    install(None)
}

/// Console logging plus OTLP trace export
pub fn init_telemetry(service_name: &str) -> Result<OtelGuard, Box<dyn Error + Send + Sync>> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .build_span_exporter()?;

    let trace_config = sdktrace::Config::default().with_resource(Resource::new(vec![
        KeyValue::new("service.name", service_name.to_string()),
    ]));

    let provider = sdktrace::TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_config(trace_config)
        .build();

    global::set_tracer_provider(provider.clone());
    let tracer = provider.tracer(service_name.to_string());

    install(Some(tracer))?;
    Ok(OtelGuard)
}
