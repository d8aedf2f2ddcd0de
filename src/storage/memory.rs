//! In-memory mock repository
//!
//! Keeps entities in process memory and waits for the configured latency
//! before every call, imitating a remote API. Used by tests, simulations and
//! the CLI's `--dry-run` mode.

use async_trait::async_trait;
use tracing::debug;

use super::collection::Collection;
use super::latency::{Latency, Operation};
use super::Repository;
use crate::error::WealthResult;
use crate::models::Entity;

pub struct InMemoryRepository<E: Entity> {
    collection: Collection<E>,
    latency: Latency,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new(latency: Latency) -> Self {
        Self {
            collection: Collection::new(),
            latency,
        }
    }

    /// An empty repository without artificial delay
    pub fn instant() -> Self {
        Self::new(Latency::none())
    }

    /// A repository pre-populated with `items`; new ids continue after the
    /// highest seeded id
    pub fn seeded(items: impl IntoIterator<Item = E>, latency: Latency) -> Self {
        Self {
            collection: Collection::seeded(items),
            latency,
        }
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn list(&self) -> WealthResult<Vec<E>> {
        self.latency.wait(Operation::List).await;
        let items = self.collection.list()?;
        debug!(entity = E::KIND, count = items.len(), "listed");
        Ok(items)
    }

    async fn get(&self, id: E::Id) -> WealthResult<E> {
        self.latency.wait(Operation::Get).await;
        self.collection.get(id)
    }

    async fn create(&self, draft: E::Draft) -> WealthResult<E> {
        self.latency.wait(Operation::Write).await;
        let entity = self.collection.create(draft)?;
        debug!(entity = E::KIND, id = %entity.id(), "created");
        Ok(entity)
    }

    async fn update(&self, id: E::Id, patch: E::Patch) -> WealthResult<E> {
        self.latency.wait(Operation::Write).await;
        let entity = self.collection.update(id, patch)?;
        debug!(entity = E::KIND, id = %id, "updated");
        Ok(entity)
    }

    async fn remove(&self, id: E::Id) -> WealthResult<()> {
        self.latency.wait(Operation::Delete).await;
        self.collection.remove(id)?;
        debug!(entity = E::KIND, id = %id, "removed");
        Ok(())
    }
}
