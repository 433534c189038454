//! OpenTelemetry export (optional, `telemetry` feature)

use anyhow::Result;

const OTLP_ENDPOINT_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

#[cfg(feature = "telemetry")]
pub type OtelLayer = tracing_opentelemetry::OpenTelemetryLayer<
    tracing_subscriber::Registry,
    opentelemetry_sdk::trace::Tracer,
>;

#[cfg(not(feature = "telemetry"))]
pub type OtelLayer = tracing_subscriber::layer::Identity;

/// Build the OTLP tracing layer if an endpoint is configured
///
/// # Environment Variables
///
/// - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (e.g., http://localhost:4317)
/// - `OTEL_SERVICE_NAME`: Service name (default: reelforge)
///
/// Runs before the subscriber exists, so outcomes are reported by [`report`].
pub fn layer() -> Result<Option<OtelLayer>> {
    let endpoint = match std::env::var(OTLP_ENDPOINT_VAR) {
        Ok(endpoint) => endpoint,
        Err(_) => return Ok(None),
    };

    #[cfg(feature = "telemetry")]
    {
        let service_name =
            std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "reelforge".to_string());
        Ok(Some(otlp_layer(&endpoint, service_name)?))
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = endpoint;
        Ok(None)
    }
}

#[cfg(feature = "telemetry")]
fn otlp_layer(endpoint: &str, service_name: String) -> Result<OtelLayer> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::runtime;
    use opentelemetry_sdk::trace::TracerProvider;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .build();
    let tracer = provider.tracer(service_name);
    opentelemetry::global::set_tracer_provider(provider);

    Ok(tracing_opentelemetry::layer().with_tracer(tracer))
}

/// Log whether spans are exported
pub fn report(enabled: bool) {
    match std::env::var(OTLP_ENDPOINT_VAR) {
        Ok(endpoint) if enabled => {
            tracing::info!(endpoint = %endpoint, "OpenTelemetry export enabled");
        }
        Ok(_) => {
            tracing::warn!("OpenTelemetry endpoint set but feature 'telemetry' not enabled");
            tracing::warn!("Rebuild with: cargo build --features telemetry");
        }
        Err(_) => {
            tracing::debug!("OpenTelemetry not configured ({} not set)", OTLP_ENDPOINT_VAR);
        }
    }
}

/// Flush pending spans
pub fn shutdown() {
    #[cfg(feature = "telemetry")]
    opentelemetry::global::shutdown_tracer_provider();
}
