mod memory;
mod persistent;

pub use memory::InMemoryRepository;
pub use persistent::WalRepository;

use std::collections::BTreeMap;
use std::io;

use async_trait::async_trait;

use crate::model::Event;

#[derive(Debug)]
pub enum StoreError {
    NotFound(i32),
    AlreadyExists(i32),
    IdExhausted,
    WalError(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "not found: {id}"),
            StoreError::AlreadyExists(id) => write!(f, "already exists: {id}"),
            StoreError::IdExhausted => write!(f, "no ids left above {}", i32::MAX),
            StoreError::WalError(e) => write!(f, "WAL error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::WalError(e.to_string())
    }
}

/// A record with an integer identity.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> i32;
    fn set_id(&mut self, id: i32);
}

/// Storage capability shared by every collaborator of the resolver.
///
/// `get_all` returns records in ascending id order for the bundled
/// implementations, which makes first-fit room selection deterministic.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn get(&self, id: i32) -> Result<T, StoreError>;

    async fn get_all(&self) -> Result<Vec<T>, StoreError>;

    /// Insert a record. A non-positive id asks the store to assign the next one.
    /// Returns the record as stored.
    async fn add(&self, entity: T) -> Result<T, StoreError>;

    async fn edit(&self, entity: T) -> Result<(), StoreError>;

    async fn remove(&self, id: i32) -> Result<(), StoreError>;
}

/// Id-ordered rows plus the event application both repositories share.
/// No locking: callers hold whatever lock guards the table.
pub(crate) struct Table<T> {
    rows: BTreeMap<i32, T>,
}

impl<T: Entity> Table<T> {
    pub(crate) fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn get(&self, id: i32) -> Result<T, StoreError> {
        self.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    pub(crate) fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn next_id(&self) -> Result<i32, StoreError> {
        match self.rows.keys().next_back() {
            Some(id) => id.checked_add(1).ok_or(StoreError::IdExhausted),
            None => Ok(1),
        }
    }

    /// Assign an id when needed and reject duplicates. Nothing is stored yet.
    pub(crate) fn prepare_add(&self, mut entity: T) -> Result<T, StoreError> {
        if entity.id() <= 0 {
            entity.set_id(self.next_id()?);
        } else if self.rows.contains_key(&entity.id()) {
            return Err(StoreError::AlreadyExists(entity.id()));
        }
        Ok(entity)
    }

    pub(crate) fn prepare_edit(&self, entity: T) -> Result<Event<T>, StoreError> {
        if !self.rows.contains_key(&entity.id()) {
            return Err(StoreError::NotFound(entity.id()));
        }
        Ok(Event::Edited(entity))
    }

    pub(crate) fn prepare_remove(&self, id: i32) -> Result<Event<T>, StoreError> {
        if !self.rows.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        Ok(Event::Removed { id })
    }

    pub(crate) fn apply(&mut self, event: &Event<T>) {
        match event {
            Event::Added(entity) | Event::Edited(entity) => {
                self.rows.insert(entity.id(), entity.clone());
            }
            Event::Removed { id } => {
                self.rows.remove(id);
            }
        }
    }

    /// Minimal event list that recreates the current rows.
    pub(crate) fn snapshot(&self) -> Vec<Event<T>> {
        self.rows.values().cloned().map(Event::Added).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Room;

    fn table_with(ids: &[i32]) -> Table<Room> {
        let mut table = Table::new();
        for &id in ids {
            let room = table.prepare_add(Room::new(id, "")).unwrap();
            table.apply(&Event::Added(room));
        }
        table
    }

    #[test]
    fn add_assigns_next_id_after_highest() {
        let table = table_with(&[3, 9]);
        let room = table.prepare_add(Room::new(0, "new")).unwrap();
        assert_eq!(room.id, 10);
    }

    #[test]
    fn add_assigns_one_on_empty_table() {
        let table: Table<Room> = Table::new();
        let room = table.prepare_add(Room::new(0, "first")).unwrap();
        assert_eq!(room.id, 1);
    }

    #[test]
    fn add_fails_when_ids_run_out() {
        let table = table_with(&[i32::MAX]);
        let result = table.prepare_add(Room::new(0, "next"));
        assert!(matches!(result, Err(StoreError::IdExhausted)));
        // Explicit ids below the top are still accepted
        assert_eq!(table.prepare_add(Room::new(7, "explicit")).unwrap().id, 7);
    }

    #[test]
    fn add_rejects_duplicate_explicit_id() {
        let table = table_with(&[4]);
        let result = table.prepare_add(Room::new(4, "dup"));
        assert!(matches!(result, Err(StoreError::AlreadyExists(4))));
    }

    #[test]
    fn edit_and_remove_require_existing_row() {
        let table = table_with(&[1]);
        assert!(matches!(
            table.prepare_edit(Room::new(2, "x")),
            Err(StoreError::NotFound(2))
        ));
        assert!(matches!(table.prepare_remove(5), Err(StoreError::NotFound(5))));
        assert!(table.prepare_remove(1).is_ok());
    }

    #[test]
    fn all_is_id_ordered() {
        let table = table_with(&[5, 2, 8, 1]);
        let ids: Vec<i32> = table.all().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 5, 8]);
    }

    #[test]
    fn snapshot_replays_to_same_rows() {
        let mut table = table_with(&[1, 2, 3]);
        let removal = table.prepare_remove(2).unwrap();
        table.apply(&removal);

        let mut rebuilt: Table<Room> = Table::new();
        for event in table.snapshot() {
            rebuilt.apply(&event);
        }
        assert_eq!(rebuilt.all(), table.all());
        assert_eq!(rebuilt.len(), 2);
    }
}
