//! MySQL-backed store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};
use tracing::debug;

use super::{BillStore, ItemStore};
use crate::billing::{to_stored_precision, Bill, BillId, BillUpdate};
use crate::catalog::{Item, ItemId, NewItem};
use crate::error::{IdentifierError, StoreError};

const INSERT_BILL: &str = "INSERT INTO bills (id, embasa, coelba, created_at, updated_at) \
     VALUES (?, ?, ?, ?, ?)";

const SELECT_BILLS: &str = "SELECT HEX(id) AS id_hex, embasa, coelba, created_at, updated_at \
     FROM bills";

const SELECT_BILLS_BETWEEN: &str = "SELECT HEX(id) AS id_hex, embasa, coelba, created_at, updated_at \
     FROM bills \
     WHERE created_at >= ? AND created_at < ? \
     ORDER BY created_at DESC";

const SELECT_BILL_BY_ID: &str = "SELECT HEX(id) AS id_hex, embasa, coelba, created_at, updated_at \
     FROM bills \
     WHERE id = ?";

const UPDATE_BILL: &str = "UPDATE bills SET embasa = ?, coelba = ?, updated_at = ? WHERE id = ?";

const DELETE_BILL: &str = "DELETE FROM bills WHERE id = ?";

const INSERT_ITEM: &str = "INSERT INTO items (name, price) VALUES (?, ?)";

const SELECT_ITEMS: &str = "SELECT id, name, price FROM items";

const UPDATE_ITEM: &str = "UPDATE items SET name = ?, price = ? WHERE id = ?";

const DELETE_ITEM: &str = "DELETE FROM items WHERE id = ?";

/// A `bills` row as selected, with the id still in hex form.
#[derive(Debug, FromRow)]
struct BillRow {
    id_hex: String,
    embasa: Decimal,
    coelba: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BillRow> for Bill {
    type Error = IdentifierError;

    fn try_from(row: BillRow) -> Result<Self, Self::Error> {
        Ok(Bill {
            id: BillId::from_hex(&row.id_hex)?,
            embasa: row.embasa,
            coelba: row.coelba,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Decode every row or fail on the first bad id.
fn decode_rows(rows: Vec<BillRow>) -> Result<Vec<Bill>, StoreError> {
    rows.into_iter()
        .map(|row| Bill::try_from(row).map_err(StoreError::from))
        .collect()
}

/// Store over a shared MySQL connection pool.
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Wrap an established pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl BillStore for MySqlStore {
    async fn insert_bill(&self, bill: &Bill) -> Result<(), StoreError> {
        sqlx::query(INSERT_BILL)
            .bind(&bill.id.as_bytes()[..])
            .bind(bill.embasa)
            .bind(bill.coelba)
            .bind(to_stored_precision(bill.created_at))
            .bind(to_stored_precision(bill.updated_at))
            .execute(&self.pool)
            .await?;

        debug!(id = %bill.id, "Inserted bill");
        Ok(())
    }

    async fn list_bills(&self) -> Result<Vec<Bill>, StoreError> {
        let rows: Vec<BillRow> = sqlx::query_as(SELECT_BILLS)
            .fetch_all(&self.pool)
            .await?;

        decode_rows(rows)
    }

    async fn bills_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bill>, StoreError> {
        let rows: Vec<BillRow> = sqlx::query_as(SELECT_BILLS_BETWEEN)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        decode_rows(rows)
    }

    async fn update_bill(
        &self,
        id: &BillId,
        changes: &BillUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Bill>, StoreError> {
        let key = &id.as_bytes()[..];

        // MySQL reports zero affected rows when nothing changed, so existence
        // is decided by the read-back, not the update result.
        sqlx::query(UPDATE_BILL)
            .bind(changes.embasa)
            .bind(changes.coelba)
            .bind(to_stored_precision(updated_at))
            .bind(key)
            .execute(&self.pool)
            .await?;

        let row: Option<BillRow> = sqlx::query_as(SELECT_BILL_BY_ID)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Bill::try_from)
            .transpose()
            .map_err(StoreError::from)
    }

    async fn delete_bill(&self, id: &BillId) -> Result<u64, StoreError> {
        let result = sqlx::query(DELETE_BILL)
            .bind(&id.as_bytes()[..])
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ItemStore for MySqlStore {
    async fn create_item(&self, input: &NewItem) -> Result<Item, StoreError> {
        let result = sqlx::query(INSERT_ITEM)
            .bind(&input.name)
            .bind(input.price)
            .execute(&self.pool)
            .await?;

        Ok(Item::with_id(result.last_insert_id() as ItemId, input.clone()))
    }

    async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        let items = sqlx::query_as::<_, Item>(SELECT_ITEMS)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn update_item(&self, id: ItemId, input: &NewItem) -> Result<u64, StoreError> {
        let result = sqlx::query(UPDATE_ITEM)
            .bind(&input.name)
            .bind(input.price)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_item(&self, id: ItemId) -> Result<u64, StoreError> {
        let result = sqlx::query(DELETE_ITEM)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
