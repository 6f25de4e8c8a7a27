//! Persistence seam for bills and items.
//!
//! Handlers only see the [`BillStore`] / [`ItemStore`] traits; the concrete
//! store is chosen at startup and injected through the HTTP state.
//!
//! - [`MySqlStore`]: the production store, backed by a `sqlx` MySQL pool
//! - [`MemoryStore`]: in-process store for tests and local runs

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::billing::{Bill, BillId, BillUpdate};
use crate::catalog::{Item, ItemId, NewItem};
use crate::error::StoreError;

pub use memory::{MemoryConfig, MemoryStore};
pub use mysql::MySqlStore;

/// Bill persistence.
#[async_trait]
pub trait BillStore: Send + Sync + 'static {
    /// Insert a fully built bill.
    async fn insert_bill(&self, bill: &Bill) -> Result<(), StoreError>;

    /// Every bill, in store order.
    async fn list_bills(&self) -> Result<Vec<Bill>, StoreError>;

    /// Bills with `start <= created_at < end`, newest first.
    async fn bills_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bill>, StoreError>;

    /// Overwrite both amounts and `updated_at`, then return the stored row.
    /// Returns `None` if no bill has this id.
    async fn update_bill(
        &self,
        id: &BillId,
        changes: &BillUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Bill>, StoreError>;

    /// Delete by id. Returns the number of rows removed.
    async fn delete_bill(&self, id: &BillId) -> Result<u64, StoreError>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Item persistence.
#[async_trait]
pub trait ItemStore: Send + Sync + 'static {
    /// Insert and return the row with its assigned id.
    async fn create_item(&self, input: &NewItem) -> Result<Item, StoreError>;

    /// Every item, in store order.
    async fn list_items(&self) -> Result<Vec<Item>, StoreError>;

    /// Overwrite name and price. Returns the number of rows matched.
    async fn update_item(&self, id: ItemId, input: &NewItem) -> Result<u64, StoreError>;

    /// Delete by id. Returns the number of rows removed.
    async fn delete_item(&self, id: ItemId) -> Result<u64, StoreError>;
}
