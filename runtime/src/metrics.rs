//! Prometheus metrics for observability and monitoring.
//!
//! This module provides metric collection for:
//! - Event store raises and range queries
//! - Special offer mutations and rejected mutations
//! - Retry attempts around remote calls
//!
//! # Example
//!
//! ```rust,no_run
//! use special_offers_runtime::metrics::MetricsRecorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut recorder = MetricsRecorder::new();
//! recorder.start()?;
//!
//! if let Some(text) = recorder.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus metrics recorder.
///
/// Installs the global recorder and renders the Prometheus text format. Serving
/// that text over HTTP is left to the host application.
#[derive(Default)]
pub struct MetricsRecorder {
    handle: Option<PrometheusHandle>,
}

impl MetricsRecorder {
    /// Create a recorder that is not installed yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Register metric descriptions and install the Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// If a recorder is already installed (e.g., by another test), this logs a
    /// warning and succeeds without a handle.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.000_01, 0.000_1, 0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!("Metrics recorder installed");
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if this instance did not install the recorder.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    // Event Store Metrics
    describe_counter!(
        "event_store_events_raised_total",
        "Total number of events appended to the event store"
    );
    describe_counter!(
        "event_store_events_loaded_total",
        "Total number of events returned by range queries"
    );
    describe_histogram!(
        "event_store_raise_duration_seconds",
        "Time taken to raise an event"
    );
    describe_histogram!(
        "event_store_query_duration_seconds",
        "Time taken to answer a range query"
    );

    // Special Offer Metrics
    describe_counter!(
        "offer_store_mutations_total",
        "Total number of special offer mutations, labelled by operation"
    );
    describe_counter!(
        "offer_store_rejections_total",
        "Total number of mutations abandoned because their event could not be raised"
    );

    // Retry Metrics
    describe_counter!(
        "retry_attempts_total",
        "Total number of retry attempts"
    );
    describe_counter!(
        "retry_successes_total",
        "Total number of operations that succeeded after at least one retry"
    );
    describe_counter!(
        "retry_exhausted_total",
        "Total number of operations that exhausted max retries"
    );
    describe_counter!(
        "retry_cancelled_total",
        "Total number of operations cancelled while retrying"
    );
}

/// Event store metrics recorder.
pub struct EventStoreMetrics;

impl EventStoreMetrics {
    /// Record a raised event.
    pub fn record_raise(duration: Duration) {
        counter!("event_store_events_raised_total").increment(1);
        histogram!("event_store_raise_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record a range query.
    pub fn record_query(count: usize, duration: Duration) {
        counter!("event_store_events_loaded_total").increment(count as u64);
        histogram!("event_store_query_duration_seconds").record(duration.as_secs_f64());
    }
}

/// Special offer store metrics recorder.
pub struct OfferStoreMetrics;

impl OfferStoreMetrics {
    /// Record a committed mutation (`"add"` or `"update"`).
    pub fn record_mutation(operation: &'static str) {
        counter!("offer_store_mutations_total", "operation" => operation).increment(1);
    }

    /// Record a mutation abandoned because its event failed to raise.
    pub fn record_rejection(operation: &'static str) {
        counter!("offer_store_rejections_total", "operation" => operation).increment(1);
    }
}

/// Retry metrics recorder.
pub struct RetryMetrics;

impl RetryMetrics {
    /// Record a retry attempt.
    pub fn record_attempt() {
        counter!("retry_attempts_total").increment(1);
    }

    /// Record a successful retry.
    pub fn record_success() {
        counter!("retry_successes_total").increment(1);
    }

    /// Record exhausted retries.
    pub fn record_exhausted() {
        counter!("retry_exhausted_total").increment(1);
    }

    /// Record a cancelled operation.
    pub fn record_cancelled() {
        counter!("retry_cancelled_total").increment(1);
    }
}
