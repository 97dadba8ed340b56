//! Whole-board persistence over a key-value byte store.
//!
//! Every save writes the full board under one fixed key; there are no
//! partial or merge writes. Loading never fails: a missing or unreadable
//! record yields the default board, and the reason is reported through
//! [`LoadOutcome`] and a `warn!` event.

use crate::db::{StorageError, StorageResult};
use crate::types::{Board, Column, Task};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "jobTrackerData";

/// A durable byte store addressed by string keys.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;
    fn put(&self, key: &str, value: &[u8]) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        (**self).put(key, value)
    }
}

/// In-memory store for tests and for front ends without a durable store.
/// Counts writes and can be told to fail them.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `put` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Make subsequent `put` calls fail with a storage error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    fn values(&self) -> StorageResult<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.values.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.values()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StorageError::Io(std::io::Error::other("write rejected")));
        }
        self.values()?.insert(key.to_string(), value.to_vec());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// How a load produced its board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The stored record was read.
    Loaded,
    /// Nothing was stored under the key; the default board was used.
    Missing,
    /// The stored record could not be read; the default board was used.
    Recovered { reason: String },
}

/// Load/save adapter binding a store to a storage key.
pub struct BoardPersistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> BoardPersistence<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serialize the board and overwrite the stored record.
    pub fn save(&self, board: &Board) -> StorageResult<()> {
        let bytes = encode_board(board)?;
        self.store.put(&self.key, &bytes)?;
        debug!(key = %self.key, bytes = bytes.len(), "Saved board");
        Ok(())
    }

    /// Read the stored board, falling back to the default board.
    pub fn load(&self) -> Board {
        self.load_with_outcome().0
    }

    pub fn load_with_outcome(&self) -> (Board, LoadOutcome) {
        let bytes = match self.store.get(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                info!(key = %self.key, "No stored board, starting empty");
                return (Board::default(), LoadOutcome::Missing);
            }
            Err(e) => return recovered(&self.key, e.to_string()),
        };

        match decode_board(&bytes) {
            Ok(board) => {
                info!(key = %self.key, tasks = board.task_count(), "Loaded board");
                (board, LoadOutcome::Loaded)
            }
            Err(e) => recovered(&self.key, e.to_string()),
        }
    }
}

fn recovered(key: &str, reason: String) -> (Board, LoadOutcome) {
    warn!(key = %key, reason = %reason, "Stored board unreadable, starting empty");
    (Board::default(), LoadOutcome::Recovered { reason })
}

/// Encode a board as its storage record.
pub fn encode_board(board: &Board) -> StorageResult<Vec<u8>> {
    Ok(serde_json::to_vec(board)?)
}

/// Decode a storage record and lay it over the known column layout.
pub fn decode_board(bytes: &[u8]) -> StorageResult<Board> {
    let stored: Board = serde_json::from_slice(bytes)?;
    Ok(normalize_board(stored))
}

/// Fit an arbitrary board onto the default column layout.
///
/// Known columns keep their stored tasks, missing ones come back empty,
/// unknown ones are dropped. A column repeated in the record has its task
/// lists concatenated in record order. Each task's `column_id` is set to the
/// column holding it, and a task id seen earlier on the board is dropped.
pub fn normalize_board(stored: Board) -> Board {
    let layout = Board::default();
    let mut by_id: HashMap<String, Vec<Task>> = HashMap::new();

    for column in stored.columns() {
        if !layout.has_column(&column.id) {
            warn!(
                column = %column.id,
                tasks = column.tasks.len(),
                "Dropping unknown column from stored board"
            );
            continue;
        }
        match by_id.get_mut(&column.id) {
            Some(tasks) => {
                warn!(
                    column = %column.id,
                    tasks = column.tasks.len(),
                    "Merging repeated column in stored board"
                );
                tasks.extend(column.tasks.iter().cloned());
            }
            None => {
                by_id.insert(column.id.clone(), column.tasks.clone());
            }
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    let columns = layout
        .columns()
        .iter()
        .map(|known| {
            let tasks: Vec<Task> = by_id
                .remove(&known.id)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|mut task| {
                    if !seen.insert(task.id.clone()) {
                        warn!(task = %task.id, "Dropping duplicate task id from stored board");
                        return None;
                    }
                    task.column_id = known.id.clone();
                    Some(task)
                })
                .collect();
            Column {
                id: known.id.clone(),
                title: known.title.clone(),
                tasks,
            }
        })
        .collect();

    Board::with_columns(columns)
}
