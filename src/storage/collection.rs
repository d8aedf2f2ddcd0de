//! Lock-guarded entity collection shared by the repository adapters
//!
//! Holds the entities keyed by id together with the id counter. The counter
//! starts at 0, so the first created entity gets id 1, and seeding raises it
//! to the highest seeded id.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{WealthError, WealthResult};
use crate::models::Entity;

/// On-disk form of a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "E: Serialize", deserialize = "E: DeserializeOwned"))]
pub struct Snapshot<E> {
    #[serde(default)]
    pub next_id: u64,
    #[serde(default = "Vec::new")]
    pub items: Vec<E>,
}

impl<E> Default for Snapshot<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            items: Vec::new(),
        }
    }
}

pub struct Collection<E: Entity> {
    items: RwLock<BTreeMap<E::Id, E>>,
    last_id: AtomicU64,
}

impl<E: Entity> Default for Collection<E> {
    fn default() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            last_id: AtomicU64::new(0),
        }
    }
}

impl<E: Entity> Collection<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection holding `items`; the counter continues after the
    /// highest id present
    pub fn seeded(items: impl IntoIterator<Item = E>) -> Self {
        Self::from_snapshot(Snapshot {
            next_id: 0,
            items: items.into_iter().collect(),
        })
    }

    pub fn from_snapshot(snapshot: Snapshot<E>) -> Self {
        let mut last_id = snapshot.next_id;
        let mut map = BTreeMap::new();
        for item in snapshot.items {
            last_id = last_id.max(item.id().into());
            map.insert(item.id(), item);
        }
        Self {
            items: RwLock::new(map),
            last_id: AtomicU64::new(last_id),
        }
    }

    pub fn snapshot(&self) -> WealthResult<Snapshot<E>> {
        let items = self.read()?;
        Ok(Snapshot {
            next_id: self.last_id.load(Ordering::SeqCst),
            items: items.values().cloned().collect(),
        })
    }

    /// Replace the contents and counter with those of `snapshot`
    pub fn restore(&self, snapshot: Snapshot<E>) -> WealthResult<()> {
        let Self { items: rebuilt, last_id } = Self::from_snapshot(snapshot);
        let rebuilt = rebuilt
            .into_inner()
            .map_err(|e| WealthError::Storage(format!("Failed to rebuild collection: {}", e)))?;
        let mut items = self.write()?;
        *items = rebuilt;
        self.last_id.store(last_id.into_inner(), Ordering::SeqCst);
        Ok(())
    }

    fn read(&self) -> WealthResult<std::sync::RwLockReadGuard<'_, BTreeMap<E::Id, E>>> {
        self.items
            .read()
            .map_err(|e| WealthError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> WealthResult<std::sync::RwLockWriteGuard<'_, BTreeMap<E::Id, E>>> {
        self.items
            .write()
            .map_err(|e| WealthError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn not_found(id: E::Id) -> WealthError {
        WealthError::not_found(E::KIND, id.to_string())
    }

    /// Copies of every entity, in the entity's list order
    pub fn list(&self) -> WealthResult<Vec<E>> {
        let items = self.read()?;
        let mut list: Vec<E> = items.values().cloned().collect();
        list.sort_by(E::list_order);
        Ok(list)
    }

    pub fn get(&self, id: E::Id) -> WealthResult<E> {
        self.read()?
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    pub fn create(&self, draft: E::Draft) -> WealthResult<E> {
        let mut items = self.write()?;
        let id = <E::Id as From<u64>>::from(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let entity = E::from_draft(id, draft);
        items.insert(id, entity.clone());
        Ok(entity)
    }

    pub fn update(&self, id: E::Id, patch: E::Patch) -> WealthResult<E> {
        let mut items = self.write()?;
        let entity = items.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        entity.apply_patch(patch);
        Ok(entity.clone())
    }

    pub fn remove(&self, id: E::Id) -> WealthResult<E> {
        self.write()?.remove(&id).ok_or_else(|| Self::not_found(id))
    }

    pub fn len(&self) -> WealthResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> WealthResult<bool> {
        Ok(self.read()?.is_empty())
    }
}
