#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Score submission with a persistent local fallback.
//!
//! Remote submission goes through the [`RankingBackend`] trait so the engine
//! never couples to a transport. When a backend fails the record lands in the
//! [`LocalRanking`] top-ten list instead, persisted as TOML through a
//! [`RankingStore`] keyed by a fixed namespace, so a finished run always ends
//! up recorded somewhere.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage namespace for the persisted local list.
pub const RANKING_NAMESPACE: &str = "selker.ranking.v1";

/// Maximum number of records the local list retains.
pub const RANKING_CAPACITY: usize = 10;

/// One finished run, as submitted to a ranking backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Display name chosen by the player.
    pub nickname: String,
    /// Final score of the run.
    pub score: u64,
    /// Wave that was active when the run ended.
    pub wave: u32,
    /// Weapon level reached during the run.
    pub weapon_level: u32,
    /// Total simulated play time in whole seconds, pauses excluded.
    pub play_time_seconds: u64,
}

/// Failure reported by a ranking backend.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The backend could not be reached.
    #[error("ranking backend unreachable: {0}")]
    Unreachable(String),
    /// The backend refused the record.
    #[error("ranking backend rejected the record: {0}")]
    Rejected(String),
}

/// Failure in the persistence layer backing the local list.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the underlying storage failed.
    #[error("ranking store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The persisted document could not be encoded.
    #[error("failed to encode ranking document: {0}")]
    Encode(#[from] toml::ser::Error),
    /// The persisted document could not be parsed.
    #[error("failed to parse ranking document: {0}")]
    Decode(#[from] toml::de::Error),
}

/// Remote destination for finished-run records.
pub trait RankingBackend {
    /// Submits the record, returning an error when the backend fails.
    fn submit(&mut self, record: &ScoreRecord) -> Result<(), SubmitError>;
}

/// Keyed document storage backing the local ranking list.
pub trait RankingStore {
    /// Loads the document stored under the namespace, if any.
    fn load(&self, namespace: &str) -> Result<Option<String>, StoreError>;

    /// Stores the document under the namespace, replacing any previous value.
    fn save(&mut self, namespace: &str, document: &str) -> Result<(), StoreError>;
}

/// In-memory store used by tests and headless runs without a data directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RankingStore for MemoryStore {
    fn load(&self, namespace: &str) -> Result<Option<String>, StoreError> {
        Ok(self.documents.get(namespace).cloned())
    }

    fn save(&mut self, namespace: &str, document: &str) -> Result<(), StoreError> {
        let _ = self
            .documents
            .insert(namespace.to_owned(), document.to_owned());
        Ok(())
    }
}

/// Store that keeps one TOML file per namespace inside a directory.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at the provided directory.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path_for(&self, namespace: &str) -> PathBuf {
        self.root.join(format!("{namespace}.toml"))
    }
}

impl RankingStore for FileStore {
    fn load(&self, namespace: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(namespace);
        match fs::read_to_string(&path) {
            Ok(document) => Ok(Some(document)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(StoreError::Io(error)),
        }
    }

    fn save(&mut self, namespace: &str, document: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(namespace), document)?;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RankingDocument {
    #[serde(default)]
    records: Vec<ScoreRecord>,
}

/// Local top-ten list ordered by descending score.
#[derive(Debug, Default)]
pub struct LocalRanking {
    records: Vec<ScoreRecord>,
}

impl LocalRanking {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the persisted list from the store, or an empty one if absent.
    pub fn load(store: &dyn RankingStore) -> Result<Self, StoreError> {
        let Some(document) = store.load(RANKING_NAMESPACE)? else {
            return Ok(Self::new());
        };
        let parsed: RankingDocument = toml::from_str(&document)?;
        let mut ranking = Self {
            records: parsed.records,
        };
        ranking.normalize();
        Ok(ranking)
    }

    /// Inserts a record, keeping descending score order and the size cap.
    ///
    /// Ties keep insertion order, so an equal score ranks below the records
    /// already present.
    pub fn insert(&mut self, record: ScoreRecord) {
        self.records.push(record);
        self.normalize();
    }

    /// Records in rank order, best first.
    #[must_use]
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    /// Persists the list into the store under the fixed namespace.
    pub fn persist(&self, store: &mut dyn RankingStore) -> Result<(), StoreError> {
        let document = RankingDocument {
            records: self.records.clone(),
        };
        let encoded = toml::to_string(&document)?;
        store.save(RANKING_NAMESPACE, &encoded)
    }

    fn normalize(&mut self) {
        self.records.sort_by(|a, b| b.score.cmp(&a.score));
        self.records.truncate(RANKING_CAPACITY);
    }
}

/// Where a submitted record ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend accepted the record.
    Remote,
    /// The backend failed; the record went into the local list.
    LocalFallback,
}

/// Submits through the backend, falling back to the local list on failure.
///
/// The fallback path persists immediately so a crash after submission cannot
/// lose the run.
pub fn submit_with_fallback(
    backend: &mut dyn RankingBackend,
    local: &mut LocalRanking,
    store: &mut dyn RankingStore,
    record: ScoreRecord,
) -> Result<SubmitOutcome, StoreError> {
    match backend.submit(&record) {
        Ok(()) => Ok(SubmitOutcome::Remote),
        Err(_) => {
            local.insert(record);
            local.persist(store)?;
            Ok(SubmitOutcome::LocalFallback)
        }
    }
}

/// Backend that always fails, for offline runs and fallback tests.
#[derive(Debug, Default)]
pub struct OfflineBackend;

impl RankingBackend for OfflineBackend {
    fn submit(&mut self, _record: &ScoreRecord) -> Result<(), SubmitError> {
        Err(SubmitError::Unreachable("offline".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(nickname: &str, score: u64) -> ScoreRecord {
        ScoreRecord {
            nickname: nickname.to_owned(),
            score,
            wave: 3,
            weapon_level: 2,
            play_time_seconds: 45,
        }
    }

    #[test]
    fn insert_keeps_descending_order() {
        let mut ranking = LocalRanking::new();
        ranking.insert(record("a", 100));
        ranking.insert(record("b", 300));
        ranking.insert(record("c", 200));

        let scores: Vec<u64> = ranking.records().iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![300, 200, 100]);
    }

    #[test]
    fn list_truncates_at_ten() {
        let mut ranking = LocalRanking::new();
        for score in 0..15u64 {
            ranking.insert(record("p", score));
        }

        assert_eq!(ranking.records().len(), RANKING_CAPACITY);
        assert_eq!(ranking.records()[0].score, 14);
        assert_eq!(ranking.records()[9].score, 5);
    }

    #[test]
    fn equal_scores_rank_below_existing_records() {
        let mut ranking = LocalRanking::new();
        ranking.insert(record("first", 100));
        ranking.insert(record("second", 100));

        assert_eq!(ranking.records()[0].nickname, "first");
        assert_eq!(ranking.records()[1].nickname, "second");
    }

    #[test]
    fn memory_store_round_trips_the_list() {
        let mut store = MemoryStore::new();
        let mut ranking = LocalRanking::new();
        ranking.insert(record("a", 100));
        ranking.insert(record("b", 300));
        ranking.persist(&mut store).expect("persist");

        let restored = LocalRanking::load(&store).expect("load");
        assert_eq!(restored.records(), ranking.records());
    }

    #[test]
    fn empty_store_loads_an_empty_list() {
        let store = MemoryStore::new();
        let ranking = LocalRanking::load(&store).expect("load");
        assert!(ranking.records().is_empty());
    }

    #[test]
    fn file_store_round_trips_the_list() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::new(dir.path().to_path_buf());

        let mut ranking = LocalRanking::new();
        ranking.insert(record("a", 42));
        ranking.persist(&mut store).expect("persist");

        let restored = LocalRanking::load(&store).expect("load");
        assert_eq!(restored.records(), ranking.records());
    }

    #[test]
    fn failed_submission_falls_back_to_the_local_list() {
        let mut backend = OfflineBackend;
        let mut local = LocalRanking::new();
        let mut store = MemoryStore::new();

        let outcome =
            submit_with_fallback(&mut backend, &mut local, &mut store, record("p", 500))
                .expect("fallback persist");

        assert_eq!(outcome, SubmitOutcome::LocalFallback);
        assert_eq!(local.records().len(), 1);
        let persisted = store.load(RANKING_NAMESPACE).expect("load").expect("doc");
        assert!(persisted.contains("500"));
    }
}
