//! In-process store for unit testing and local runs.
//!
//! Mirrors the MySQL store's observable behavior: timestamps keep whole
//! seconds only, range queries come back newest first, updates and deletes
//! of unknown ids succeed with zero rows, and item ids count up from 1.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{BillStore, ItemStore};
use crate::billing::{to_stored_precision, Bill, BillId, BillUpdate, DateRange};
use crate::catalog::{Item, ItemId, NewItem};
use crate::error::StoreError;

/// Configuration for memory store behavior.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    /// Whether to fail read operations.
    pub fail_reads: bool,
    /// Whether to fail write operations.
    pub fail_writes: bool,
}

/// Memory-backed store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Failure injection settings.
    config: MemoryConfig,
    /// Bills in insertion order.
    bills: RwLock<Vec<Bill>>,
    /// Items in insertion order.
    items: RwLock<Vec<Item>>,
    /// Last assigned item id.
    last_item_id: AtomicI64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with custom failure behavior.
    pub fn with_config(config: MemoryConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Number of stored bills.
    pub async fn bill_count(&self) -> usize {
        self.bills.read().await.len()
    }

    fn check_read(&self) -> Result<(), StoreError> {
        if self.config.fail_reads {
            return Err(injected("read"));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.config.fail_writes {
            return Err(injected("write"));
        }
        Ok(())
    }
}

fn injected(kind: &str) -> StoreError {
    StoreError::Database(sqlx::Error::Protocol(format!("memory store {kind} failure")))
}

#[async_trait]
impl BillStore for MemoryStore {
    async fn insert_bill(&self, bill: &Bill) -> Result<(), StoreError> {
        self.check_write()?;

        let mut bills = self.bills.write().await;
        if bills.iter().any(|b| b.id == bill.id) {
            return Err(StoreError::Database(sqlx::Error::Protocol(format!(
                "duplicate entry for key 'PRIMARY': {}",
                bill.id
            ))));
        }
        bills.push(Bill {
            created_at: to_stored_precision(bill.created_at),
            updated_at: to_stored_precision(bill.updated_at),
            ..bill.clone()
        });
        Ok(())
    }

    async fn list_bills(&self) -> Result<Vec<Bill>, StoreError> {
        self.check_read()?;
        Ok(self.bills.read().await.clone())
    }

    async fn bills_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bill>, StoreError> {
        self.check_read()?;

        let range = DateRange::Between { start, end };
        let mut matching: Vec<Bill> = self
            .bills
            .read()
            .await
            .iter()
            .filter(|b| range.contains(b.created_at))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn update_bill(
        &self,
        id: &BillId,
        changes: &BillUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Bill>, StoreError> {
        self.check_write()?;

        let mut bills = self.bills.write().await;
        Ok(bills.iter_mut().find(|b| b.id == *id).map(|bill| {
            bill.embasa = changes.embasa;
            bill.coelba = changes.coelba;
            bill.updated_at = to_stored_precision(updated_at);
            bill.clone()
        }))
    }

    async fn delete_bill(&self, id: &BillId) -> Result<u64, StoreError> {
        self.check_write()?;

        let mut bills = self.bills.write().await;
        let before = bills.len();
        bills.retain(|b| b.id != *id);
        Ok((before - bills.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_read()
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn create_item(&self, input: &NewItem) -> Result<Item, StoreError> {
        self.check_write()?;

        let id = self.last_item_id.fetch_add(1, Ordering::SeqCst) + 1;
        let item = Item::with_id(id, input.clone());
        self.items.write().await.push(item.clone());
        Ok(item)
    }

    async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        self.check_read()?;
        Ok(self.items.read().await.clone())
    }

    async fn update_item(&self, id: ItemId, input: &NewItem) -> Result<u64, StoreError> {
        self.check_write()?;

        let mut items = self.items.write().await;
        match items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.name = input.name.clone();
                item.price = input.price;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_item(&self, id: ItemId) -> Result<u64, StoreError> {
        self.check_write()?;

        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|i| i.id != id);
        Ok((before - items.len()) as u64)
    }
}
