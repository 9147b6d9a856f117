use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::model::Event;
use crate::wal::Wal;

use super::{Entity, Repository, StoreError, Table};

/// File-backed repository: every mutation is appended to a WAL and fsynced
/// before it becomes visible; the table is rebuilt from the log on open.
///
/// Lock order is table, then WAL.
pub struct WalRepository<T> {
    table: RwLock<Table<T>>,
    wal: Mutex<Wal>,
    path: PathBuf,
}

impl<T> WalRepository<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let events: Vec<Event<T>> = Wal::replay(path)?;
        let mut table = Table::new();
        for event in &events {
            table.apply(event);
        }
        let wal = Wal::open(path)?;
        info!(
            "opened {}: replayed {} records, {} live",
            path.display(),
            events.len(),
            table.len()
        );
        Ok(Self {
            table: RwLock::new(table),
            wal: Mutex::new(wal),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn appends_since_compact(&self) -> u64 {
        self.wal.lock().await.appends_since_compact()
    }

    /// Rewrite the log as one `Added` record per live row.
    pub async fn compact(&self) -> Result<(), StoreError> {
        let table = self.table.read().await;
        let events = table.snapshot();
        let mut wal = self.wal.lock().await;
        wal.compact(&events)?;
        debug!("compacted {} to {} records", self.path.display(), events.len());
        Ok(())
    }

    /// WAL-append then apply, under the caller's table write lock.
    async fn persist_and_apply(&self, table: &mut Table<T>, event: &Event<T>) -> Result<(), StoreError> {
        self.wal.lock().await.append(event)?;
        metrics::counter!(crate::observability::WAL_APPENDS_TOTAL).increment(1);
        table.apply(event);
        Ok(())
    }
}

#[async_trait]
impl<T> Repository<T> for WalRepository<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    async fn get(&self, id: i32) -> Result<T, StoreError> {
        self.table.read().await.get(id)
    }

    async fn get_all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.table.read().await.all())
    }

    async fn add(&self, entity: T) -> Result<T, StoreError> {
        let mut table = self.table.write().await;
        let stored = table.prepare_add(entity)?;
        self.persist_and_apply(&mut table, &Event::Added(stored.clone()))
            .await?;
        Ok(stored)
    }

    async fn edit(&self, entity: T) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        let event = table.prepare_edit(entity)?;
        self.persist_and_apply(&mut table, &event).await
    }

    async fn remove(&self, id: i32) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        let event = table.prepare_remove(id)?;
        self.persist_and_apply(&mut table, &event).await
    }
}
