//! The board store: sole owner of the current board snapshot.
//!
//! Every mutation computes a new [`Board`] value, adopts it as the current
//! snapshot, and writes it through the persistence adapter before
//! returning. A failed write is reported to the caller but the new snapshot
//! stays in place. Mutations take `&mut self`, so the store cannot be
//! re-entered while one is in progress; readers get `Arc<Board>` values
//! that never change underneath them.

pub mod moves;
pub mod query;

use crate::error::{BoardError, BoardResult};
use crate::persistence::{BoardPersistence, KeyValueStore, LoadOutcome, normalize_board};
use crate::types::{Board, ColumnId, Task, TaskFields};
use moves::{MoveCommand, MoveOutcome};
use query::{Query, QueryResult};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// A task together with the column holding it and its index there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLocation {
    pub task: Task,
    pub column_id: ColumnId,
    pub column_title: String,
    pub index: usize,
}

pub struct BoardStore<S: KeyValueStore> {
    snapshot: Arc<Board>,
    persistence: BoardPersistence<S>,
    load_outcome: LoadOutcome,
}

impl<S: KeyValueStore> BoardStore<S> {
    /// Load the board from `store` under the default key.
    pub fn open(store: S) -> Self {
        Self::from_persistence(BoardPersistence::new(store))
    }

    /// Load the board from `store` under `key`.
    pub fn open_with_key(store: S, key: impl Into<String>) -> Self {
        Self::from_persistence(BoardPersistence::with_key(store, key))
    }

    pub fn from_persistence(persistence: BoardPersistence<S>) -> Self {
        let (board, load_outcome) = persistence.load_with_outcome();
        Self {
            snapshot: Arc::new(board),
            persistence,
            load_outcome,
        }
    }

    /// How the initial board was obtained.
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn persistence(&self) -> &BoardPersistence<S> {
        &self.persistence
    }

    /// The current board.
    pub fn snapshot(&self) -> Arc<Board> {
        Arc::clone(&self.snapshot)
    }

    /// Look up a task and where it sits.
    pub fn find_task(&self, task_id: &str) -> Option<TaskLocation> {
        self.snapshot.locate(task_id).map(|(column, index)| TaskLocation {
            task: column.tasks[index].clone(),
            column_id: column.id.clone(),
            column_title: column.title.clone(),
            index,
        })
    }

    /// Append a new task to the end of `column_id`.
    pub fn add_task(&mut self, column_id: &str, fields: TaskFields) -> BoardResult<Task> {
        if !self.snapshot.has_column(column_id) {
            return Err(BoardError::unknown_column(column_id));
        }

        let task = Task::from_fields(new_task_id(), column_id, fields);
        let mut next = (*self.snapshot).clone();
        if let Some(column) = next.column_mut(column_id) {
            column.tasks.push(task.clone());
        }

        debug!(task_id = %task.id, column_id = %column_id, "Added task");
        self.commit(next)
            .map_err(|e| e.with_details(format!("task {} was added but not saved", task.id)))?;
        Ok(task)
    }

    /// Edit a task's fields, optionally moving it to another column.
    ///
    /// In the same column the task keeps its index. A column change appends
    /// the task to the end of the target column.
    pub fn update_task(
        &mut self,
        task_id: &str,
        fields: TaskFields,
        target_column_id: &str,
    ) -> BoardResult<Task> {
        let (current_column_id, index) = self
            .snapshot
            .locate(task_id)
            .map(|(column, idx)| (column.id.clone(), idx))
            .ok_or_else(|| BoardError::task_not_found(task_id))?;
        if !self.snapshot.has_column(target_column_id) {
            return Err(BoardError::unknown_column(target_column_id).with_field("target_column_id"));
        }

        let mut next = (*self.snapshot).clone();
        let updated = if current_column_id == target_column_id {
            let column = next
                .column_mut(&current_column_id)
                .ok_or_else(|| BoardError::task_not_found(task_id))?;
            let updated = column.tasks[index].merged(fields, target_column_id);
            column.tasks[index] = updated.clone();
            updated
        } else {
            let previous = next
                .column_mut(&current_column_id)
                .map(|column| column.tasks.remove(index))
                .ok_or_else(|| BoardError::task_not_found(task_id))?;
            let updated = previous.merged(fields, target_column_id);
            next.column_mut(target_column_id)
                .ok_or_else(|| BoardError::unknown_column(target_column_id))?
                .tasks
                .push(updated.clone());
            updated
        };

        debug!(
            task_id = %task_id,
            from = %current_column_id,
            to = %target_column_id,
            "Updated task"
        );
        self.commit(next)
            .map_err(|e| e.with_details(format!("task {} was updated but not saved", task_id)))?;
        Ok(updated)
    }

    /// Remove a task. Returns `false` without writing if no task has that id.
    pub fn delete_task(&mut self, task_id: &str) -> BoardResult<bool> {
        let Some(column_id) = self.snapshot.locate(task_id).map(|(c, _)| c.id.clone()) else {
            debug!(task_id = %task_id, "Delete of absent task ignored");
            return Ok(false);
        };

        let mut next = (*self.snapshot).clone();
        if let Some(column) = next.column_mut(&column_id) {
            column.tasks.retain(|t| t.id != task_id);
        }

        debug!(task_id = %task_id, column_id = %column_id, "Deleted task");
        self.commit(next)?;
        Ok(true)
    }

    /// Apply a drag-and-drop move. A no-op move leaves the snapshot alone
    /// and writes nothing.
    pub fn move_task(&mut self, command: &MoveCommand) -> BoardResult<Arc<Board>> {
        match moves::compute(&self.snapshot, command)? {
            MoveOutcome::Unchanged => Ok(self.snapshot()),
            MoveOutcome::Moved { board, task_id } => {
                debug!(
                    task_id = %task_id,
                    from = %command.source_column_id,
                    to = ?command.dest_column_id,
                    "Moved task"
                );
                self.commit(board)?;
                Ok(self.snapshot())
            }
        }
    }

    /// Replace the whole board, e.g. from an imported record. The board is
    /// fitted onto the known column layout first.
    pub fn replace_board(&mut self, board: Board) -> BoardResult<Arc<Board>> {
        let next = normalize_board(board);
        debug!(tasks = next.task_count(), "Replacing board");
        self.commit(next)?;
        Ok(self.snapshot())
    }

    /// Filtered projection and stats of the current board.
    pub fn query(&self, query: &Query) -> QueryResult {
        query::run(&self.snapshot, query)
    }

    fn commit(&mut self, next: Board) -> BoardResult<()> {
        self.snapshot = Arc::new(next);
        if let Err(e) = self.persistence.save(&self.snapshot) {
            warn!(error = %e, "Board change kept in memory but not saved");
            return Err(BoardError::from(e));
        }
        Ok(())
    }
}

fn new_task_id() -> String {
    format!("task-{}", Uuid::now_v7())
}
