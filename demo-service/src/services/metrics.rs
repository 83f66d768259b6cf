//! Prometheus metrics for demo-service.
//!
//! Service counters live in the default `prometheus` registry and are
//! registered lazily on first use. HTTP request metrics come from
//! `service_core::middleware::metrics_middleware` through the `metrics`
//! facade and are rendered by the recorder installed in [`init_metrics`].

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};
use std::sync::OnceLock;

static RECORDER_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Greeting requests by mode and outcome.
pub static GREETINGS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "demo_greetings_total",
        "Total number of greeting requests",
        &["mode", "outcome"] // outcome: ok, missing_name, or a GenerationError kind
    )
    .expect("Failed to register demo_greetings_total")
});

/// Text generation latency by provider.
pub static GENERATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "demo_generation_duration_seconds",
        "Text generation call duration in seconds",
        &["provider"],
        vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]
    )
    .expect("Failed to register demo_generation_duration_seconds")
});

/// User operations by operation and outcome.
pub static USER_OPERATIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "demo_user_operations_total",
        "Total number of user create/read operations",
        &["operation", "outcome"] // create|read; created, found, not_found, invalid, or a StoreError kind
    )
    .expect("Failed to register demo_user_operations_total")
});

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "demo_db_query_duration_seconds",
        "Database query duration in seconds",
        &["query"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register demo_db_query_duration_seconds")
});

/// Install the `metrics` recorder used by the HTTP middleware.
///
/// Only the binary calls this; tests run without a recorder.
pub fn init_metrics() -> Result<(), BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = RECORDER_HANDLE.set(handle);
    Ok(())
}

/// Render both metric sources in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = RECORDER_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    let encoder = TextEncoder::new();
    match encoder.encode_to_string(&prometheus::gather()) {
        Ok(service_metrics) => output.push_str(&service_metrics),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            output.push_str(&format!("# Failed to encode metrics: {}\n", e));
        }
    }

    output
}

pub fn record_greeting(mode: &str, outcome: &str) {
    GREETINGS_TOTAL.with_label_values(&[mode, outcome]).inc();
}

pub fn record_generation_latency(provider: &str, duration_secs: f64) {
    GENERATION_DURATION
        .with_label_values(&[provider])
        .observe(duration_secs);
}

pub fn record_user_operation(operation: &str, outcome: &str) {
    USER_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}
