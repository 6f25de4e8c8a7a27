//! Shared HTTP state and service endpoints (health, readiness, metrics).

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::store::{BillStore, ItemStore, MemoryStore};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Bill persistence.
    pub bills: Arc<dyn BillStore>,
    /// Item persistence.
    pub items: Arc<dyn ItemStore>,
    /// Prometheus handle, if a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
    /// Whether `/items` routes are mounted.
    pub items_enabled: bool,
}

impl AppState {
    /// Create state over separate bill and item stores.
    pub fn new(bills: Arc<dyn BillStore>, items: Arc<dyn ItemStore>) -> Self {
        Self {
            bills,
            items,
            metrics: None,
            items_enabled: false,
        }
    }

    /// Create state where one store serves both resources.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: BillStore + ItemStore,
    {
        Self::new(store.clone(), store)
    }

    /// Create state over a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Mount or hide the legacy `/items` controller.
    pub fn with_items_enabled(mut self, enabled: bool) -> Self {
        self.items_enabled = enabled;
        self
    }
}

/// Unwrap a JSON body, mapping any rejection to a 400.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection.body_text());
            Err(ApiError::InvalidInput("Invalid JSON".to_string()))
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether the store answered.
    pub ready: bool,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 if the store answers, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match state.bills.ping().await {
        Ok(()) => (StatusCode::OK, Json(ReadyResponse { ready: true })),
        Err(e) => {
            warn!("Readiness probe failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse { ready: false }),
            )
        }
    }
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::NOT_FOUND,
            "metrics recorder not installed".to_string(),
        ),
    }
}
