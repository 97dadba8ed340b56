//! Drag-and-drop relocation of a single task.

use crate::error::{BoardError, BoardResult};
use crate::types::{Board, ColumnId, TaskId};
use serde::{Deserialize, Serialize};

/// A requested relocation of one task, as produced by a drag gesture.
///
/// A command without a destination (dropped outside any column) is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCommand {
    pub source_column_id: ColumnId,
    pub source_index: i64,
    #[serde(default)]
    pub dest_column_id: Option<ColumnId>,
    #[serde(default)]
    pub dest_index: Option<i64>,
}

impl MoveCommand {
    pub fn new(
        source_column_id: impl Into<ColumnId>,
        source_index: i64,
        dest_column_id: impl Into<ColumnId>,
        dest_index: i64,
    ) -> Self {
        Self {
            source_column_id: source_column_id.into(),
            source_index,
            dest_column_id: Some(dest_column_id.into()),
            dest_index: Some(dest_index),
        }
    }

    /// A drag that ended outside any valid drop target.
    pub fn cancelled(source_column_id: impl Into<ColumnId>, source_index: i64) -> Self {
        Self {
            source_column_id: source_column_id.into(),
            source_index,
            dest_column_id: None,
            dest_index: None,
        }
    }

    pub fn destination(&self) -> Option<(&str, i64)> {
        match (&self.dest_column_id, self.dest_index) {
            (Some(column), Some(index)) => Some((column.as_str(), index)),
            _ => None,
        }
    }

    fn is_same_slot(&self) -> bool {
        self.destination()
            .is_some_and(|(col, idx)| col == self.source_column_id && idx == self.source_index)
    }
}

/// Result of applying a move command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing changed; the input board stands.
    Unchanged,
    /// One task was relocated.
    Moved { board: Board, task_id: TaskId },
}

/// Compute the board that results from `command`.
///
/// Same-column moves remove the task first and then insert at the
/// destination index of the shortened list. Cross-column moves insert at
/// the destination index of the destination list as it stood. Destination
/// indices outside `[0, len]` are clamped. A source index that names no
/// task is an error.
pub fn compute(board: &Board, command: &MoveCommand) -> BoardResult<MoveOutcome> {
    let Some((dest_column_id, dest_index)) = command.destination() else {
        return Ok(MoveOutcome::Unchanged);
    };
    if command.is_same_slot() {
        return Ok(MoveOutcome::Unchanged);
    }

    let source_column_id = command.source_column_id.as_str();
    let source = board
        .column(source_column_id)
        .ok_or_else(|| BoardError::unknown_column(source_column_id).with_field("source_column_id"))?;
    if !board.has_column(dest_column_id) {
        return Err(BoardError::unknown_column(dest_column_id).with_field("dest_column_id"));
    }

    let source_index = usize::try_from(command.source_index)
        .ok()
        .filter(|idx| *idx < source.tasks.len())
        .ok_or_else(|| BoardError::no_task_at(source_column_id, command.source_index))?;

    let mut next = board.clone();

    let mut task = match next.column_mut(source_column_id) {
        Some(column) => column.tasks.remove(source_index),
        None => return Err(BoardError::unknown_column(source_column_id)),
    };
    let task_id = task.id.clone();
    task.column_id = dest_column_id.to_string();

    let Some(dest) = next.column_mut(dest_column_id) else {
        return Err(BoardError::unknown_column(dest_column_id));
    };
    let insert_at = clamp_index(dest_index, dest.tasks.len());
    if dest_column_id == source_column_id && insert_at == source_index {
        return Ok(MoveOutcome::Unchanged);
    }
    dest.tasks.insert(insert_at, task);

    Ok(MoveOutcome::Moved {
        board: next,
        task_id,
    })
}

fn clamp_index(index: i64, len: usize) -> usize {
    if index <= 0 {
        0
    } else {
        usize::try_from(index).map_or(len, |idx| idx.min(len))
    }
}
