use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use crate::limits::{MAX_DESCRIPTION_LEN, MAX_SEED_ROOMS};
use crate::model::Room;
use crate::store::{Repository, StoreError};

#[derive(Debug)]
pub enum SeedError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Store(StoreError),
    LimitExceeded(&'static str),
    DuplicateId(i32),
}

impl std::fmt::Display for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedError::Io(e) => write!(f, "cannot read seed file: {e}"),
            SeedError::Json(e) => write!(f, "malformed seed file: {e}"),
            SeedError::Store(e) => write!(f, "seeding failed: {e}"),
            SeedError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            SeedError::DuplicateId(id) => write!(f, "room id {id} appears more than once in seed file"),
        }
    }
}

impl std::error::Error for SeedError {}

impl From<std::io::Error> for SeedError {
    fn from(e: std::io::Error) -> Self {
        SeedError::Io(e)
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(e: serde_json::Error) -> Self {
        SeedError::Json(e)
    }
}

impl From<StoreError> for SeedError {
    fn from(e: StoreError) -> Self {
        SeedError::Store(e)
    }
}

/// Parse a JSON array of rooms, e.g. `[{"id": 1, "description": "Double"}]`.
///
/// The whole file is checked before anything is stored, so a bad seed never
/// leaves a partially populated store behind. Non-positive ids are assigned
/// by the store and may repeat.
pub fn parse_rooms(json: &str) -> Result<Vec<Room>, SeedError> {
    let rooms: Vec<Room> = serde_json::from_str(json)?;
    if rooms.len() > MAX_SEED_ROOMS {
        return Err(SeedError::LimitExceeded("too many rooms in seed file"));
    }
    if rooms.iter().any(|r| r.description.len() > MAX_DESCRIPTION_LEN) {
        return Err(SeedError::LimitExceeded("room description too long"));
    }
    let mut seen = HashSet::new();
    for room in rooms.iter().filter(|r| r.id > 0) {
        if !seen.insert(room.id) {
            return Err(SeedError::DuplicateId(room.id));
        }
    }
    Ok(rooms)
}

/// Load rooms from `path` into `repo` if the store holds no rooms yet.
/// Returns how many rooms were added.
pub async fn seed_rooms(repo: &dyn Repository<Room>, path: &Path) -> Result<usize, SeedError> {
    if !repo.get_all().await?.is_empty() {
        debug!("room store already populated, skipping seed {}", path.display());
        return Ok(0);
    }
    let json = tokio::fs::read_to_string(path).await?;
    let rooms = parse_rooms(&json)?;
    let count = rooms.len();
    for room in rooms {
        repo.add(room).await?;
    }
    info!("seeded {count} rooms from {}", path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryRepository;

    #[test]
    fn parse_rooms_reads_array() {
        let rooms = parse_rooms(r#"[{"id": 1, "description": "test1"}, {"id": 2, "description": "test2"}]"#)
            .unwrap();
        assert_eq!(rooms, vec![Room::new(1, "test1"), Room::new(2, "test2")]);
    }

    #[test]
    fn parse_rooms_rejects_malformed_json() {
        assert!(matches!(parse_rooms("{not json"), Err(SeedError::Json(_))));
    }

    #[test]
    fn parse_rooms_rejects_long_description() {
        let long = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        let json = format!(r#"[{{"id": 1, "description": "{long}"}}]"#);
        assert!(matches!(parse_rooms(&json), Err(SeedError::LimitExceeded(_))));
    }

    #[test]
    fn parse_rooms_rejects_duplicate_id() {
        let json = r#"[{"id": 1, "description": "a"}, {"id": 2, "description": "b"}, {"id": 1, "description": "c"}]"#;
        assert!(matches!(parse_rooms(json), Err(SeedError::DuplicateId(1))));
    }

    #[test]
    fn parse_rooms_allows_repeated_unassigned_ids() {
        let rooms = parse_rooms(r#"[{"id": 0, "description": "a"}, {"id": 0, "description": "b"}]"#).unwrap();
        assert_eq!(rooms.len(), 2);
    }

    fn seed_file(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("roomcheck_test_seed");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn seed_into_empty_store() {
        let path = seed_file("empty_store.json", r#"[{"id": 1, "description": "a"}, {"id": 2, "description": "b"}]"#);
        let repo: InMemoryRepository<Room> = InMemoryRepository::new();
        assert_eq!(seed_rooms(&repo, &path).await.unwrap(), 2);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn seed_skips_populated_store() {
        let path = seed_file("populated_store.json", r#"[{"id": 5, "description": "new"}]"#);
        let repo = InMemoryRepository::with_records(vec![Room::new(1, "existing")]);
        assert_eq!(seed_rooms(&repo, &path).await.unwrap(), 0);
        assert_eq!(repo.get_all().await.unwrap(), vec![Room::new(1, "existing")]);
    }

    #[tokio::test]
    async fn seed_with_duplicate_id_stores_nothing() {
        let path = seed_file(
            "duplicate_id.json",
            r#"[{"id": 1, "description": "a"}, {"id": 2, "description": "b"}, {"id": 1, "description": "c"}]"#,
        );
        let repo: InMemoryRepository<Room> = InMemoryRepository::new();
        assert!(matches!(seed_rooms(&repo, &path).await, Err(SeedError::DuplicateId(1))));
        assert!(repo.is_empty().await);

        // Store stayed empty, so a corrected file still seeds on the next start
        let fixed = seed_file("duplicate_id_fixed.json", r#"[{"id": 1, "description": "a"}, {"id": 2, "description": "b"}]"#);
        assert_eq!(seed_rooms(&repo, &fixed).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn seed_missing_file_is_io_error() {
        let repo: InMemoryRepository<Room> = InMemoryRepository::new();
        let missing = std::env::temp_dir().join("roomcheck_test_seed_missing.json");
        let _ = std::fs::remove_file(&missing);
        assert!(matches!(seed_rooms(&repo, &missing).await, Err(SeedError::Io(_))));
    }
}
