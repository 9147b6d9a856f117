use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::model::Event;

use super::{Entity, Repository, StoreError, Table};

/// Volatile repository. Used as the test double and for embedding the
/// resolver without a backing file.
pub struct InMemoryRepository<T> {
    table: RwLock<Table<T>>,
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::new()),
        }
    }

    /// Pre-populate with records that keep their own ids.
    /// A later record with a repeated id replaces the earlier one.
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let mut table = Table::new();
        for record in records {
            table.apply(&Event::Added(record));
        }
        Self {
            table: RwLock::new(table),
        }
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn get(&self, id: i32) -> Result<T, StoreError> {
        self.table.read().await.get(id)
    }

    async fn get_all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.table.read().await.all())
    }

    async fn add(&self, entity: T) -> Result<T, StoreError> {
        let mut table = self.table.write().await;
        let stored = table.prepare_add(entity)?;
        table.apply(&Event::Added(stored.clone()));
        Ok(stored)
    }

    async fn edit(&self, entity: T) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        let event = table.prepare_edit(entity)?;
        table.apply(&event);
        Ok(())
    }

    async fn remove(&self, id: i32) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        let event = table.prepare_remove(id)?;
        table.apply(&event);
        Ok(())
    }
}
