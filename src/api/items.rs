//! Legacy item catalog endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;

use super::handlers::{json_body, AppState};
use crate::catalog::{Item, ItemId, NewItem};
use crate::error::ApiError;
use crate::metrics::{track, Operation};

fn parse_item_id(raw: &str) -> Result<ItemId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::InvalidInput("Invalid ID format".to_string()))
}

/// Create an item; the store assigns the id.
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = NewItem,
    responses(
        (status = 200, description = "Stored item", body = Item),
        (status = 400, description = "Invalid JSON"),
        (status = 500, description = "Store error")
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> Result<Json<Item>, ApiError> {
    let input = json_body(payload)?;
    let item = track(Operation::CreateItem, state.items.create_item(&input)).await?;
    Ok(Json(item))
}

/// List every item.
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    responses(
        (status = 200, description = "All items", body = [Item]),
        (status = 500, description = "Store error")
    )
)]
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
    let items = track(Operation::ListItems, state.items.list_items()).await?;
    Ok(Json(items))
}

/// Overwrite an item's name and price.
#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "items",
    params(("id" = i64, Path, description = "Item id")),
    request_body = NewItem,
    responses(
        (status = 200, description = "Item with its new values", body = Item),
        (status = 400, description = "Invalid id or JSON"),
        (status = 500, description = "Store error")
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_item_id(&id)?;
    let input = json_body(payload)?;

    let matched = track(Operation::UpdateItem, state.items.update_item(id, &input)).await?;
    debug!(id, matched, "Updated item");

    Ok(Json(Item::with_id(id, input)))
}

/// Delete an item. Unknown ids still return 200.
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Deleted (or never existed)"),
        (status = 400, description = "Invalid id"),
        (status = 500, description = "Store error")
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_item_id(&id)?;

    let removed = track(Operation::DeleteItem, state.items.delete_item(id)).await?;
    debug!(id, removed, "Deleted item");

    Ok(StatusCode::OK)
}
