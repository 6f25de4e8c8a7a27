//! Prometheus metrics for store operations.
//!
//! This module provides:
//! - Per-operation success/failure counters
//! - Store round-trip latency histograms
//! - Recorder installation for the `/metrics` endpoint

use std::future::Future;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use strum::{Display, IntoStaticStr};
use tracing::debug;

use crate::error::StoreError;

// === Metric Name Constants ===

/// Store operations counter metric name.
pub const METRIC_STORE_OPERATIONS: &str = "store_operations_total";
/// Store failures counter metric name.
pub const METRIC_STORE_FAILURES: &str = "store_failures_total";
/// Store round-trip latency metric name.
pub const METRIC_STORE_LATENCY: &str = "store_latency_ms";

/// Store operation performed on behalf of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    /// `POST /bills`.
    CreateBill,
    /// `GET /bills/all` or an unfiltered `GET /bills`.
    ListBills,
    /// `GET /bills?start=..&end=..`.
    FilterBills,
    /// `PUT /bills/{id}`.
    UpdateBill,
    /// `DELETE /bills/{id}`.
    DeleteBill,
    /// `POST /items`.
    CreateItem,
    /// `GET /items`.
    ListItems,
    /// `PUT /items/{id}`.
    UpdateItem,
    /// `DELETE /items/{id}`.
    DeleteItem,
}

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(
        METRIC_STORE_OPERATIONS,
        "Total number of store operations by operation and outcome"
    );
    describe_counter!(
        METRIC_STORE_FAILURES,
        "Total number of store operations that failed"
    );
    describe_histogram!(
        METRIC_STORE_LATENCY,
        "Store round-trip latency in milliseconds"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and describe metrics.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    operation: Operation,
}

impl LatencyTimer {
    /// Create a new latency timer for the given operation.
    pub fn new(operation: Operation) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let operation: &'static str = self.operation.into();
        histogram!(METRIC_STORE_LATENCY, "operation" => operation).record(self.elapsed_ms());
    }
}

/// Record the outcome of a store operation.
pub fn record_outcome<T>(operation: Operation, result: &Result<T, StoreError>) {
    let op: &'static str = operation.into();
    let outcome = if result.is_ok() { "ok" } else { "error" };
    counter!(METRIC_STORE_OPERATIONS, "operation" => op, "outcome" => outcome).increment(1);
    if result.is_err() {
        counter!(METRIC_STORE_FAILURES, "operation" => op).increment(1);
    }
}

/// Time a store call and count its outcome.
pub async fn track<T, F>(operation: Operation, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    let _timer = LatencyTimer::new(operation);
    let result = call.await;
    record_outcome(operation, &result);
    result
}
