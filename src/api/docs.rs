//! OpenAPI document for the HTTP API.

use axum::Json;
use utoipa::OpenApi;

use super::{bills, items};
use crate::billing::{Bill, BillUpdate, NewBill};
use crate::catalog::{Item, NewItem};

/// Generated OpenAPI description of the bill and item endpoints.
#[derive(OpenApi)]
#[openapi(
    info(title = "utility-bills", description = "EMBASA / COELBA bill tracking API"),
    paths(
        bills::create_bill,
        bills::list_bills,
        bills::filter_bills,
        bills::update_bill,
        bills::delete_bill,
        items::create_item,
        items::list_items,
        items::update_item,
        items::delete_item,
    ),
    components(schemas(Bill, NewBill, BillUpdate, Item, NewItem)),
    tags(
        (name = "bills", description = "Utility bill records"),
        (name = "items", description = "Legacy item catalog")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON.
pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
