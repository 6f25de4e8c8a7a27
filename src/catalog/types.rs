//! Item catalog types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Store-assigned item key.
pub type ItemId = i64;

/// A catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    /// Auto-increment key.
    pub id: ItemId,
    /// Display name, at most 100 characters.
    pub name: String,
    /// Unit price.
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
}

/// Body of `POST /items` and `PUT /items/{id}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewItem {
    /// Display name.
    pub name: String,
    /// Unit price.
    #[schema(value_type = f64)]
    pub price: Decimal,
}

impl Item {
    /// Pair an id with its field values.
    pub fn with_id(id: ItemId, input: NewItem) -> Self {
        Self {
            id,
            name: input.name,
            price: input.price,
        }
    }
}
