//! HTTP API route definitions.

use std::path::Path;
use std::time::Duration;

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, LINK};
use axum::http::{HeaderName, Method};
use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::bills::{create_bill, delete_bill, filter_bills, list_bills, update_bill};
use super::docs::openapi;
use super::handlers::{health, metrics, ready, AppState};
use super::items::{create_item, delete_item, list_items, update_item};

/// Browser clients may send this header with mutating requests.
const X_CSRF_TOKEN: HeaderName = HeaderName::from_static("x-csrf-token");

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi))
        // Bills
        .route("/bills", get(filter_bills).post(create_bill))
        .route("/bills/all", get(list_bills))
        .route("/bills/:id", put(update_bill).delete(delete_bill));

    if state.items_enabled {
        router = router
            .route("/items", get(list_items).post(create_item))
            .route("/items/:id", put(update_item).delete(delete_item));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Serve the static frontend for every path the API does not handle.
pub fn with_frontend(router: Router, dir: impl AsRef<Path>) -> Router {
    router.fallback_service(ServeDir::new(dir))
}

/// Permissive CORS policy for the browser frontend.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE, X_CSRF_TOKEN])
        .expose_headers([LINK])
        .max_age(Duration::from_secs(300))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::store::{MemoryConfig, MemoryStore};

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let app = create_router(AppState::in_memory());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ready_endpoint_returns_503_when_store_is_down() {
        let store = MemoryStore::with_config(MemoryConfig {
            fail_reads: true,
            ..Default::default()
        });
        let app = create_router(AppState::from_store(Arc::new(store)));

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn ready_endpoint_returns_200_when_store_answers() {
        let app = create_router(AppState::in_memory());

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn items_are_hidden_unless_enabled() {
        let app = create_router(AppState::in_memory());
        let response = app
            .oneshot(Request::builder().uri("/items").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let app = create_router(AppState::in_memory().with_items_enabled(true));
        let response = app
            .oneshot(Request::builder().uri("/items").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn preflight_allows_frontend_methods() {
        let app = create_router(AppState::in_memory());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/bills")
                    .header("origin", "http://localhost:3000")
                    .header("access-control-request-method", "PUT")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-max-age"], "300");
        let methods = headers["access-control-allow-methods"].to_str().unwrap();
        assert!(methods.contains("PUT"));
        assert!(methods.contains("DELETE"));
    }

    #[tokio::test]
    async fn metrics_endpoint_is_404_without_recorder() {
        let app = create_router(AppState::in_memory());

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
