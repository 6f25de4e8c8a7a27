//! Bill endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::{debug, info};

use super::handlers::{json_body, AppState};
use crate::billing::range::RangeParams;
use crate::billing::{
    parse_range, to_stored_precision, Bill, BillId, BillUpdate, DateRange, NewBill,
};
use crate::error::ApiError;
use crate::metrics::{track, Operation};

/// Create a bill with a server-generated id.
#[utoipa::path(
    post,
    path = "/bills",
    tag = "bills",
    request_body = NewBill,
    responses(
        (status = 200, description = "Stored bill", body = Bill),
        (status = 400, description = "Invalid JSON"),
        (status = 500, description = "Store error")
    )
)]
pub async fn create_bill(
    State(state): State<AppState>,
    payload: Result<Json<NewBill>, JsonRejection>,
) -> Result<Json<Bill>, ApiError> {
    let input = json_body(payload)?;
    let bill = Bill::create(input, Utc::now());

    track(Operation::CreateBill, state.bills.insert_bill(&bill)).await?;

    info!(id = %bill.id, "Created bill");
    Ok(Json(bill))
}

/// List every bill, unordered.
#[utoipa::path(
    get,
    path = "/bills/all",
    tag = "bills",
    responses(
        (status = 200, description = "All bills", body = [Bill]),
        (status = 500, description = "Store error")
    )
)]
pub async fn list_bills(State(state): State<AppState>) -> Result<Json<Vec<Bill>>, ApiError> {
    let bills = track(Operation::ListBills, state.bills.list_bills()).await?;
    Ok(Json(bills))
}

/// List bills created within `[start, end + 1 day)`, newest first.
///
/// With neither parameter this is the same as `GET /bills/all`.
#[utoipa::path(
    get,
    path = "/bills",
    tag = "bills",
    params(RangeParams),
    responses(
        (status = 200, description = "Matching bills, newest first", body = [Bill]),
        (status = 400, description = "Invalid date format"),
        (status = 500, description = "Store error")
    )
)]
pub async fn filter_bills(
    State(state): State<AppState>,
    query: Result<Query<RangeParams>, QueryRejection>,
) -> Result<Json<Vec<Bill>>, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;

    let range = parse_range(params.start.as_deref(), params.end.as_deref(), Utc::now())?;

    let bills = match range {
        DateRange::All => {
            debug!("No date range given, returning all bills");
            track(Operation::ListBills, state.bills.list_bills()).await?
        }
        DateRange::Between { start, end } => {
            debug!(%start, %end, "Filtering bills by creation date");
            track(Operation::FilterBills, state.bills.bills_between(start, end)).await?
        }
    };

    Ok(Json(bills))
}

/// Replace both amounts of a bill. Unknown ids still return 200.
#[utoipa::path(
    put,
    path = "/bills/{id}",
    tag = "bills",
    params(("id" = String, Path, description = "Bill UUID")),
    request_body = BillUpdate,
    responses(
        (status = 200, description = "Bill as stored after the update, or the submitted values if no bill matched", body = Bill),
        (status = 400, description = "Invalid id or JSON"),
        (status = 500, description = "Store error")
    )
)]
pub async fn update_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BillUpdate>, JsonRejection>,
) -> Result<Json<Bill>, ApiError> {
    let id: BillId = id.parse()?;
    let changes = json_body(payload)?;
    let now = to_stored_precision(Utc::now());

    let updated = track(
        Operation::UpdateBill,
        state.bills.update_bill(&id, &changes, now),
    )
    .await?;

    let bill = match updated {
        Some(bill) => bill,
        None => {
            debug!(%id, "Update matched no bill");
            Bill::detached(id, changes, now)
        }
    };

    Ok(Json(bill))
}

/// Delete a bill. Unknown ids still return 200.
#[utoipa::path(
    delete,
    path = "/bills/{id}",
    tag = "bills",
    params(("id" = String, Path, description = "Bill UUID")),
    responses(
        (status = 200, description = "Deleted (or never existed)"),
        (status = 400, description = "Invalid id"),
        (status = 500, description = "Store error")
    )
)]
pub async fn delete_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: BillId = id.parse()?;

    let removed = track(Operation::DeleteBill, state.bills.delete_bill(&id)).await?;
    debug!(%id, removed, "Deleted bill");

    Ok(StatusCode::OK)
}
