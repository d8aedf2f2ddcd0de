//! Storage layer for WealthFlow
//!
//! Every entity type lives in its own repository behind the async
//! [`Repository`] trait. Two adapters exist: an in-memory mock that imitates
//! API latency, and a JSON-file store used by the CLI. [`Storage`] bundles
//! one repository per entity type.

pub mod collection;
pub mod file_io;
pub mod json_file;
pub mod latency;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

pub use collection::Snapshot;
pub use file_io::{read_json, write_json_atomic};
pub use json_file::JsonFileRepository;
pub use latency::{Latency, Operation};
pub use memory::InMemoryRepository;

use crate::config::WealthPaths;
use crate::error::WealthResult;
use crate::models::{Bill, Budget, Entity, Goal, Transaction};

/// Async CRUD access to one entity type
///
/// `get`, `update` and `remove` fail with a not-found error for unknown ids.
/// `update` merges the patch over the stored entity.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Copies of all entities in the entity's list order
    async fn list(&self) -> WealthResult<Vec<E>>;

    async fn get(&self, id: E::Id) -> WealthResult<E>;

    /// Store a new entity; the repository assigns its id
    async fn create(&self, draft: E::Draft) -> WealthResult<E>;

    async fn update(&self, id: E::Id, patch: E::Patch) -> WealthResult<E>;

    async fn remove(&self, id: E::Id) -> WealthResult<()>;
}

pub type SharedRepository<E> = Arc<dyn Repository<E>>;

/// One repository per entity type
#[derive(Clone)]
pub struct Storage {
    pub transactions: SharedRepository<Transaction>,
    pub budgets: SharedRepository<Budget>,
    pub goals: SharedRepository<Goal>,
    pub bills: SharedRepository<Bill>,
}

impl Storage {
    /// Empty in-memory repositories with the given latency
    pub fn in_memory(latency: Latency) -> Self {
        Self {
            transactions: Arc::new(InMemoryRepository::new(latency)),
            budgets: Arc::new(InMemoryRepository::new(latency)),
            goals: Arc::new(InMemoryRepository::new(latency)),
            bills: Arc::new(InMemoryRepository::new(latency)),
        }
    }

    /// Repositories backed by the JSON files under the data directory
    pub fn open(paths: &WealthPaths) -> WealthResult<Self> {
        paths.ensure_directories()?;
        Ok(Self {
            transactions: Arc::new(JsonFileRepository::open(paths.transactions_file())?),
            budgets: Arc::new(JsonFileRepository::open(paths.budgets_file())?),
            goals: Arc::new(JsonFileRepository::open(paths.goals_file())?),
            bills: Arc::new(JsonFileRepository::open(paths.bills_file())?),
        })
    }

    /// In-memory repositories seeded from the data files; changes are never
    /// written back
    pub fn detached(paths: &WealthPaths, latency: Latency) -> WealthResult<Self> {
        Ok(Self {
            transactions: Arc::new(seeded_from(&paths.transactions_file(), latency)?),
            budgets: Arc::new(seeded_from(&paths.budgets_file(), latency)?),
            goals: Arc::new(seeded_from(&paths.goals_file(), latency)?),
            bills: Arc::new(seeded_from(&paths.bills_file(), latency)?),
        })
    }
}

fn seeded_from<E: Entity>(
    path: &std::path::Path,
    latency: Latency,
) -> WealthResult<InMemoryRepository<E>> {
    let snapshot = JsonFileRepository::<E>::load_snapshot(path)?;
    Ok(InMemoryRepository::seeded(snapshot.items, latency))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillDraft, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn rent() -> BillDraft {
        BillDraft::new(
            "Rent",
            Money::from_units(1_200),
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_open_creates_data_directory() {
        let dir = TempDir::new().unwrap();
        let paths = WealthPaths::with_base_dir(dir.path().to_path_buf());
        let storage = Storage::open(&paths).unwrap();

        assert!(dir.path().join("data").exists());
        assert!(storage.bills.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detached_storage_does_not_write_back() {
        let dir = TempDir::new().unwrap();
        let paths = WealthPaths::with_base_dir(dir.path().to_path_buf());
        Storage::open(&paths).unwrap().bills.create(rent()).await.unwrap();

        let detached = Storage::detached(&paths, Latency::none()).unwrap();
        let created = detached.bills.create(rent()).await.unwrap();
        assert_eq!(created.id.value(), 2);
        assert_eq!(detached.bills.list().await.unwrap().len(), 2);

        let reopened = Storage::open(&paths).unwrap();
        assert_eq!(reopened.bills.list().await.unwrap().len(), 1);
    }
}
