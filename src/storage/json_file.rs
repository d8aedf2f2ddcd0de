//! JSON-file backed repository
//!
//! Loads its collection from a single JSON file on open and rewrites that
//! file atomically after every successful mutation. A mutation whose write
//! fails is rolled back. There is no artificial latency here.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use super::collection::{Collection, Snapshot};
use super::file_io::{read_json, write_json_atomic};
use super::Repository;
use crate::error::{WealthError, WealthResult};
use crate::models::Entity;

pub struct JsonFileRepository<E: Entity> {
    path: PathBuf,
    collection: Collection<E>,
    /// Serializes mutate-then-persist so the file never goes backwards
    write_lock: Mutex<()>,
}

impl<E: Entity> JsonFileRepository<E> {
    /// Open the repository stored at `path`; a missing file is an empty one
    pub fn open(path: impl Into<PathBuf>) -> WealthResult<Self> {
        let path = path.into();
        let snapshot: Snapshot<E> = read_json(&path)?;
        debug!(entity = E::KIND, path = %path.display(), count = snapshot.items.len(), "loaded");
        Ok(Self {
            path,
            collection: Collection::from_snapshot(snapshot),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored snapshot without opening a repository
    pub fn load_snapshot(path: &Path) -> WealthResult<Snapshot<E>> {
        read_json(path)
    }

    fn mutate<T>(&self, op: impl FnOnce(&Collection<E>) -> WealthResult<T>) -> WealthResult<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| WealthError::Storage(format!("Failed to acquire file lock: {}", e)))?;
        let before = self.collection.snapshot()?;
        let result = op(&self.collection)?;
        if let Err(err) = write_json_atomic(&self.path, &self.collection.snapshot()?) {
            // Memory must keep matching the file
            self.collection.restore(before)?;
            return Err(err);
        }
        Ok(result)
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for JsonFileRepository<E> {
    async fn list(&self) -> WealthResult<Vec<E>> {
        self.collection.list()
    }

    async fn get(&self, id: E::Id) -> WealthResult<E> {
        self.collection.get(id)
    }

    async fn create(&self, draft: E::Draft) -> WealthResult<E> {
        let entity = self.mutate(|c| c.create(draft))?;
        debug!(entity = E::KIND, id = %entity.id(), "created and saved");
        Ok(entity)
    }

    async fn update(&self, id: E::Id, patch: E::Patch) -> WealthResult<E> {
        let entity = self.mutate(|c| c.update(id, patch))?;
        debug!(entity = E::KIND, id = %id, "updated and saved");
        Ok(entity)
    }

    async fn remove(&self, id: E::Id) -> WealthResult<()> {
        self.mutate(|c| c.remove(id))?;
        debug!(entity = E::KIND, id = %id, "removed and saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Goal, GoalDraft, GoalPatch, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn draft(name: &str) -> GoalDraft {
        GoalDraft::new(
            name,
            Money::from_units(5_000),
            NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_changes_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("goals.json");

        let repo = JsonFileRepository::<Goal>::open(&path).unwrap();
        let car = repo.create(draft("Car")).await.unwrap();
        let trip = repo.create(draft("Trip")).await.unwrap();
        repo.update(
            car.id,
            GoalPatch {
                current_amount: Some(Money::from_units(750)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        repo.remove(trip.id).await.unwrap();

        let reopened = JsonFileRepository::<Goal>::open(&path).unwrap();
        let goals = reopened.list().await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].current_amount, Money::from_units(750));

        // The removed id is not handed out again
        let next = reopened.create(draft("House")).await.unwrap();
        assert_eq!(next.id.value(), 3);
    }

    #[tokio::test]
    async fn test_failed_update_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("goals.json");

        let repo = JsonFileRepository::<Goal>::open(&path).unwrap();
        let err = repo
            .update(crate::models::GoalId::new(1), GoalPatch::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_collection_unchanged() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("sub");
        let path = nested.join("goals.json");

        let repo = JsonFileRepository::<Goal>::open(&path).unwrap();
        let car = repo.create(draft("Car")).await.unwrap();

        // A plain file where the data directory should be makes every write fail
        std::fs::remove_dir_all(&nested).unwrap();
        std::fs::write(&nested, b"blocked").unwrap();

        assert!(repo.create(draft("Trip")).await.is_err());
        assert!(repo
            .update(
                car.id,
                GoalPatch {
                    current_amount: Some(Money::from_units(900)),
                    ..Default::default()
                },
            )
            .await
            .is_err());
        assert!(repo.remove(car.id).await.is_err());

        let goals = repo.list().await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].current_amount, Money::zero());

        // The failed create did not consume an id
        std::fs::remove_file(&nested).unwrap();
        let house = repo.create(draft("House")).await.unwrap();
        assert_eq!(house.id.value(), 2);
    }
}
