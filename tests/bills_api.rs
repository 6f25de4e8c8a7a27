//! End-to-end tests of the bill endpoints over an in-memory store.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

use utility_bills::api::{create_router, AppState};
use utility_bills::billing::{Bill, NewBill};
use utility_bills::store::{BillStore, MemoryConfig, MemoryStore};

fn app(store: Arc<MemoryStore>) -> Router {
    create_router(AppState::from_store(store))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn bills_from(bytes: &[u8]) -> Vec<Bill> {
    serde_json::from_slice(bytes).unwrap()
}

async fn seed(store: &MemoryStore, created_at: DateTime<Utc>) -> Bill {
    let bill = Bill::create(
        NewBill {
            embasa: dec!(100),
            coelba: dec!(200),
            created_at: Some(created_at),
        },
        created_at,
    );
    store.insert_bill(&bill).await.unwrap();
    bill
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

#[tokio::test]
async fn create_then_list_all() {
    let app = app(Arc::new(MemoryStore::new()));
    let before = Utc::now().trunc_subsecs(0);

    let (status, body) = send(
        &app,
        Method::POST,
        "/bills",
        Some(json!({"embasa": 123.45, "coelba": 67.89})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let created: Bill = serde_json::from_slice(&body).unwrap();

    let (status, body) = send(&app, Method::GET, "/bills/all", None).await;
    assert_eq!(status, StatusCode::OK);
    let bills = bills_from(&body);

    assert_eq!(bills.len(), 1);
    let bill = &bills[0];
    assert_eq!(bill.id, created.id);
    assert_eq!(bill.embasa, dec!(123.45));
    assert_eq!(bill.coelba, dec!(67.89));
    assert!(bill.created_at >= before && bill.created_at <= Utc::now());
    assert_eq!(bill.updated_at, bill.created_at);
    assert_ne!(bill.id.to_string(), "00000000-0000-0000-0000-000000000000");
}

#[tokio::test]
async fn create_response_matches_stored_row() {
    let app = app(Arc::new(MemoryStore::new()));

    let (status, body) = send(
        &app,
        Method::POST,
        "/bills",
        Some(json!({
            "embasa": 1,
            "coelba": 2,
            "created_at": "2025-09-30T23:59:59.600Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let created: Bill = serde_json::from_slice(&body).unwrap();
    assert_eq!(created.created_at, at(2025, 9, 30, 23) + chrono::Duration::seconds(3599));
    assert_eq!(created.updated_at.timestamp_subsec_nanos(), 0);

    let (_, body) = send(&app, Method::GET, "/bills/all", None).await;
    assert_eq!(bills_from(&body), vec![created.clone()]);

    let (_, body) = send(
        &app,
        Method::GET,
        "/bills?start=2025-09-30&end=2025-09-30",
        None,
    )
    .await;
    assert_eq!(bills_from(&body), vec![created]);
}

#[tokio::test]
async fn create_keeps_supplied_created_at() {
    let app = app(Arc::new(MemoryStore::new()));

    let (status, body) = send(
        &app,
        Method::POST,
        "/bills",
        Some(json!({
            "embasa": 10,
            "coelba": 20,
            "created_at": "2025-09-28T12:00:00Z",
            "updated_at": null
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let created: Bill = serde_json::from_slice(&body).unwrap();
    assert_eq!(created.created_at, at(2025, 9, 28, 12));
    assert!(created.updated_at > created.created_at);
}

#[tokio::test]
async fn create_rejects_malformed_json() {
    let app = app(Arc::new(MemoryStore::new()));

    for body in [json!({"embasa": "abc", "coelba": 1}), json!({"coelba": 1}), json!("bill")] {
        let (status, _) = send(&app, Method::POST, "/bills", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/bills")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_reports_store_failure_as_500() {
    let store = MemoryStore::with_config(MemoryConfig {
        fail_writes: true,
        ..Default::default()
    });
    let app = app(Arc::new(store));

    let (status, body) = send(
        &app,
        Method::POST,
        "/bills",
        Some(json!({"embasa": 1, "coelba": 2})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(String::from_utf8(body).unwrap().contains("memory store write failure"));
}

#[tokio::test]
async fn filter_by_range_is_inclusive_of_end_day_and_newest_first() {
    let store = Arc::new(MemoryStore::new());
    let early = seed(&store, at(2025, 9, 1, 0)).await;
    let inside = seed(&store, at(2025, 9, 28, 12)).await;
    seed(&store, at(2025, 10, 1, 0)).await;
    seed(&store, at(2025, 8, 31, 23)).await;
    let app = app(store);

    let (status, body) = send(
        &app,
        Method::GET,
        "/bills?start=2025-09-01&end=2025-09-30",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = bills_from(&body).iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![inside.id, early.id]);
}

#[tokio::test]
async fn filter_with_only_end_starts_at_reference_year() {
    let store = Arc::new(MemoryStore::new());
    let old = seed(&store, at(2024, 12, 31, 12)).await;
    let kept = seed(&store, at(2025, 2, 10, 9)).await;
    let app = app(store);

    let (status, body) = send(&app, Method::GET, "/bills?end=2025-03-01", None).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = bills_from(&body).iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![kept.id]);
    assert!(!ids.contains(&old.id));
}

#[tokio::test]
async fn filter_without_parameters_matches_list_all() {
    let store = Arc::new(MemoryStore::new());
    seed(&store, at(2024, 5, 1, 0)).await;
    seed(&store, at(2025, 9, 28, 12)).await;
    let app = app(store);

    let (_, all) = send(&app, Method::GET, "/bills/all", None).await;
    let (status, filtered) = send(&app, Method::GET, "/bills", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bills_from(&filtered), bills_from(&all));

    let (_, empty_params) = send(&app, Method::GET, "/bills?start=&end=", None).await;
    assert_eq!(bills_from(&empty_params), bills_from(&all));
}

#[tokio::test]
async fn filter_rejects_invalid_start_regardless_of_end() {
    let app = app(Arc::new(MemoryStore::new()));

    for uri in [
        "/bills?start=invalid",
        "/bills?start=invalid&end=2025-09-30",
        "/bills?start=invalid&end=also-invalid",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "Invalid start date format. Use YYYY-MM-DD"
        );
    }

    let (status, _) = send(&app, Method::GET, "/bills?end=09/30/2025", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_changes_amounts_and_updated_at_only() {
    let store = Arc::new(MemoryStore::new());
    let original = seed(&store, at(2025, 9, 28, 12)).await;
    let app = app(store);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/bills/{}", original.id),
        Some(json!({"embasa": 200.0, "coelba": 300.0, "id": "ignored"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let updated: Bill = serde_json::from_slice(&body).unwrap();
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.embasa, dec!(200));
    assert_eq!(updated.coelba, dec!(300));
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at > original.updated_at);

    let (_, body) = send(&app, Method::GET, "/bills/all", None).await;
    assert_eq!(bills_from(&body), vec![updated]);
}

#[tokio::test]
async fn update_accepts_upper_case_ids() {
    let store = Arc::new(MemoryStore::new());
    let original = seed(&store, at(2025, 9, 28, 12)).await;
    let app = app(store);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/bills/{}", original.id.to_string().to_uppercase()),
        Some(json!({"embasa": 1, "coelba": 2})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn update_validates_id_and_body() {
    let store = Arc::new(MemoryStore::new());
    let original = seed(&store, at(2025, 9, 28, 12)).await;
    let app = app(store);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/bills/not-a-uuid",
        Some(json!({"embasa": 1, "coelba": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(String::from_utf8(body).unwrap(), "Invalid ID format");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/bills/{}", original.id),
        Some(json!({"embasa": "lots"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_of_unknown_bill_echoes_submitted_values() {
    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone());

    let (status, body) = send(
        &app,
        Method::PUT,
        "/bills/550E8400-E29B-41D4-A716-446655440000",
        Some(json!({"embasa": 1, "coelba": 2})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let echoed: Bill = serde_json::from_slice(&body).unwrap();
    assert_eq!(echoed.id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    assert_eq!(echoed.embasa, dec!(1));
    assert_eq!(echoed.coelba, dec!(2));
    assert_eq!(echoed.created_at.timestamp(), -62_135_596_800);
    assert_eq!(store.bill_count().await, 0);
}

#[tokio::test]
async fn delete_removes_bill_and_tolerates_unknown_ids() {
    let store = Arc::new(MemoryStore::new());
    let doomed = seed(&store, at(2025, 9, 28, 12)).await;
    let kept = seed(&store, at(2025, 9, 29, 12)).await;
    let app = app(store.clone());

    let (status, body) = send(&app, Method::DELETE, &format!("/bills/{}", doomed.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let (_, body) = send(&app, Method::GET, "/bills/all", None).await;
    assert_eq!(bills_from(&body), vec![kept]);

    let (status, _) = send(&app, Method::DELETE, &format!("/bills/{}", doomed.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.bill_count().await, 1);

    let (status, _) = send(&app, Method::DELETE, "/bills/12345", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_failure_is_500() {
    let store = MemoryStore::with_config(MemoryConfig {
        fail_reads: true,
        ..Default::default()
    });
    let app = app(Arc::new(store));

    let (status, _) = send(&app, Method::GET, "/bills/all", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, Method::GET, "/bills?start=2025-01-01", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn empty_store_lists_as_empty_array() {
    let app = app(Arc::new(MemoryStore::new()));

    let (status, body) = send(&app, Method::GET, "/bills/all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "[]");
}
