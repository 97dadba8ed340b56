//! Integration tests for the board store.
//!
//! These tests drive the store through its public operations and check the
//! resulting snapshots and persistence writes.

use jobtrackr::board::BoardStore;
use jobtrackr::board::moves::MoveCommand;
use jobtrackr::error::ErrorCode;
use jobtrackr::persistence::{BoardPersistence, MemoryStore};
use jobtrackr::types::{Board, Priority, TaskFields};
use std::collections::HashSet;

/// Helper to create a store over a fresh in-memory key-value store.
fn setup_store() -> BoardStore<MemoryStore> {
    BoardStore::open(MemoryStore::new())
}

fn add(store: &mut BoardStore<MemoryStore>, column_id: &str, company: &str) -> String {
    store
        .add_task(
            column_id,
            TaskFields::new().with_company(company).with_role("Engineer"),
        )
        .expect("Failed to add task")
        .id
}

fn companies(board: &Board, column_id: &str) -> Vec<String> {
    board
        .column(column_id)
        .unwrap()
        .tasks
        .iter()
        .map(|t| t.company.clone())
        .collect()
}

fn assert_unique_ids(board: &Board) {
    let mut seen = HashSet::new();
    for (column, task) in board.tasks() {
        assert!(seen.insert(task.id.clone()), "duplicate id {}", task.id);
        assert_eq!(task.column_id, column.id);
    }
}

mod add_tests {
    use super::*;

    #[test]
    fn add_applies_defaults() {
        let mut store = setup_store();

        let task = store
            .add_task("column-1", TaskFields::new().with_company("Foo").with_role("Eng"))
            .unwrap();

        assert_eq!(task.priority, Priority::Medium);
        assert!(task.tags.is_empty());
        assert_eq!(task.due_date, "");
        assert_eq!(task.url, "");
        assert_eq!(task.notes, "");
        assert_eq!(task.column_id, "column-1");
        assert!(task.id.starts_with("task-"));
    }

    #[test]
    fn add_appends_to_end_of_column() {
        let mut store = setup_store();
        add(&mut store, "column-2", "A");
        add(&mut store, "column-2", "B");

        assert_eq!(companies(&store.snapshot(), "column-2"), vec!["A", "B"]);
    }

    #[test]
    fn add_normalizes_comma_separated_tags() {
        let mut store = setup_store();

        let task = store
            .add_task(
                "column-1",
                TaskFields::new()
                    .with_company("Foo")
                    .with_role("Eng")
                    .with_tags("rust, ,remote,rust"),
            )
            .unwrap();

        assert_eq!(task.tags, vec!["rust", "remote"]);
    }

    #[test]
    fn add_to_unknown_column_is_validation_error() {
        let mut store = setup_store();

        let err = store
            .add_task("column-42", TaskFields::new().with_company("Foo"))
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(store.snapshot().task_count(), 0);
        assert_eq!(store.persistence().store().write_count(), 0);
    }

    #[test]
    fn generated_ids_are_unique() {
        let mut store = setup_store();
        for i in 0..50 {
            add(&mut store, "column-1", &format!("Company {}", i));
        }
        assert_unique_ids(&store.snapshot());
        assert_eq!(store.snapshot().task_count(), 50);
    }
}

mod update_tests {
    use super::*;

    #[test]
    fn update_in_place_keeps_index_and_unspecified_fields() {
        let mut store = setup_store();
        add(&mut store, "column-2", "A");
        let id = store
            .add_task(
                "column-2",
                TaskFields::new()
                    .with_company("B")
                    .with_role("Eng")
                    .with_priority(Priority::High)
                    .with_tags(vec!["remote"])
                    .with_due_date("2026-06-01"),
            )
            .unwrap()
            .id;
        add(&mut store, "column-2", "C");

        let updated = store
            .update_task(&id, TaskFields::new().with_notes("Recruiter call"), "column-2")
            .unwrap();

        assert_eq!(updated.notes, "Recruiter call");
        assert_eq!(updated.company, "B");
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.tags, vec!["remote"]);
        assert_eq!(updated.due_date, "2026-06-01");
        assert_eq!(companies(&store.snapshot(), "column-2"), vec!["A", "B", "C"]);
    }

    #[test]
    fn blank_due_date_keeps_previous_value() {
        let mut store = setup_store();
        let id = store
            .add_task(
                "column-1",
                TaskFields::new().with_company("A").with_due_date("2026-06-01"),
            )
            .unwrap()
            .id;

        let updated = store
            .update_task(&id, TaskFields::new().with_due_date(""), "column-1")
            .unwrap();

        assert_eq!(updated.due_date, "2026-06-01");
    }

    #[test]
    fn update_to_other_column_appends_at_end() {
        let mut store = setup_store();
        let moving = add(&mut store, "column-1", "Mover");
        add(&mut store, "column-1", "Stayer");
        add(&mut store, "column-2", "X");
        add(&mut store, "column-2", "Y");

        let updated = store
            .update_task(&moving, TaskFields::new().with_role("Staff"), "column-2")
            .unwrap();

        let board = store.snapshot();
        assert_eq!(updated.column_id, "column-2");
        assert_eq!(updated.role, "Staff");
        assert_eq!(companies(&board, "column-1"), vec!["Stayer"]);
        assert_eq!(companies(&board, "column-2"), vec!["X", "Y", "Mover"]);
        assert_unique_ids(&board);
    }

    #[test]
    fn update_unknown_task_is_not_found() {
        let mut store = setup_store();
        let err = store
            .update_task("task-missing", TaskFields::new(), "column-1")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn update_to_unknown_column_is_rejected_without_effect() {
        let mut store = setup_store();
        let id = add(&mut store, "column-1", "A");
        let before = store.snapshot();

        let err = store
            .update_task(&id, TaskFields::new(), "column-77")
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(*store.snapshot(), *before);
    }
}

mod delete_tests {
    use super::*;

    #[test]
    fn delete_removes_task() {
        let mut store = setup_store();
        let a = add(&mut store, "column-3", "A");
        add(&mut store, "column-3", "B");

        assert!(store.delete_task(&a).unwrap());
        assert_eq!(companies(&store.snapshot(), "column-3"), vec!["B"]);
    }

    #[test]
    fn double_delete_is_a_quiet_no_op() {
        let mut store = setup_store();
        let a = add(&mut store, "column-3", "A");
        assert!(store.delete_task(&a).unwrap());
        let writes = store.persistence().store().write_count();

        assert!(!store.delete_task(&a).unwrap());
        assert_eq!(store.persistence().store().write_count(), writes);
    }
}

mod move_tests {
    use super::*;

    #[test]
    fn same_column_reorder() {
        let mut store = setup_store();
        add(&mut store, "column-2", "A");
        add(&mut store, "column-2", "B");
        add(&mut store, "column-2", "C");

        let board = store
            .move_task(&MoveCommand::new("column-2", 0, "column-2", 2))
            .unwrap();

        assert_eq!(companies(&board, "column-2"), vec!["B", "C", "A"]);
    }

    #[test]
    fn cross_column_move() {
        let mut store = setup_store();
        let x = add(&mut store, "column-1", "X");

        let board = store
            .move_task(&MoveCommand::new("column-1", 0, "column-2", 0))
            .unwrap();

        assert!(companies(&board, "column-1").is_empty());
        assert_eq!(companies(&board, "column-2"), vec!["X"]);
        assert_eq!(board.task(&x).unwrap().column_id, "column-2");
    }

    #[test]
    fn no_op_drop_does_not_write() {
        let mut store = setup_store();
        add(&mut store, "column-2", "A");
        add(&mut store, "column-2", "B");
        let before = store.snapshot();
        let writes = store.persistence().store().write_count();

        let after = store
            .move_task(&MoveCommand::new("column-2", 1, "column-2", 1))
            .unwrap();
        assert_eq!(*after, *before);

        store
            .move_task(&MoveCommand::cancelled("column-2", 0))
            .unwrap();
        assert_eq!(store.persistence().store().write_count(), writes);
    }

    #[test]
    fn move_from_empty_slot_is_not_found() {
        let mut store = setup_store();
        let err = store
            .move_task(&MoveCommand::new("column-1", 0, "column-2", 0))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn sequence_of_operations_keeps_ids_unique_and_count_stable() {
        let mut store = setup_store();
        let a = add(&mut store, "column-1", "A");
        add(&mut store, "column-1", "B");
        add(&mut store, "column-2", "C");

        let moves = [
            MoveCommand::new("column-1", 0, "column-2", 1),
            MoveCommand::new("column-2", 1, "column-8", 0),
            MoveCommand::new("column-2", 0, "column-2", 1),
            MoveCommand::new("column-1", 0, "column-1", 5),
        ];
        for cmd in &moves {
            let before = store.snapshot().task_count();
            let board = store.move_task(cmd).unwrap();
            assert_eq!(board.task_count(), before);
            assert_unique_ids(&board);
        }

        store
            .update_task(&a, TaskFields::new(), "column-5")
            .unwrap();
        assert_unique_ids(&store.snapshot());
        assert_eq!(store.snapshot().task_count(), 3);
    }
}

mod storage_failure_tests {
    use super::*;

    #[test]
    fn failed_save_is_reported_but_change_is_kept() {
        let mut store = setup_store();
        store.persistence().store().set_fail_writes(true);

        let err = store
            .add_task("column-1", TaskFields::new().with_company("Kept"))
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(err.details.unwrap().contains("not saved"));
        assert_eq!(companies(&store.snapshot(), "column-1"), vec!["Kept"]);
    }

    #[test]
    fn every_mutation_writes_the_snapshot() {
        let persistence = BoardPersistence::new(MemoryStore::new());
        let mut store = BoardStore::from_persistence(persistence);

        let a = add(&mut store, "column-1", "A");
        let b = add(&mut store, "column-1", "B");
        let c = add(&mut store, "column-1", "C");
        store
            .move_task(&MoveCommand::new("column-1", 0, "column-4", 0))
            .unwrap();
        store
            .update_task(&b, TaskFields::new().with_notes("Onsite next week"), "column-1")
            .unwrap();
        assert_eq!(store.persistence().load(), *store.snapshot());
        store
            .update_task(&c, TaskFields::new().with_priority(Priority::Low), "column-6")
            .unwrap();
        assert_eq!(store.persistence().load(), *store.snapshot());
        store.delete_task(&a).unwrap();

        assert_eq!(store.persistence().store().write_count(), 7);
        let loaded = store.persistence().load();
        assert_eq!(loaded, *store.snapshot());
        assert_eq!(loaded.task(&b).unwrap().notes, "Onsite next week");
        assert_eq!(loaded.task(&c).unwrap().column_id, "column-6");
    }
}

mod lookup_tests {
    use super::*;
    use jobtrackr::types::Column;

    #[test]
    fn find_task_reports_column_and_index() {
        let mut store = setup_store();
        add(&mut store, "column-4", "A");
        let b = add(&mut store, "column-4", "B");

        let location = store.find_task(&b).unwrap();

        assert_eq!(location.task.company, "B");
        assert_eq!(location.column_id, "column-4");
        assert_eq!(location.column_title, "Technical Interview");
        assert_eq!(location.index, 1);
        assert!(store.find_task("task-nope").is_none());
    }

    #[test]
    fn replace_board_normalizes_and_saves() {
        let mut store = setup_store();
        add(&mut store, "column-1", "Old");

        let mut applied = Column::new("column-2", "Renamed");
        let mut source = setup_store();
        let task = source
            .add_task("column-5", TaskFields::new().with_company("Imported"))
            .unwrap();
        applied.tasks.push(task);
        let incoming = Board::with_columns(vec![applied, Column::new("column-99", "Extra")]);

        let board = store.replace_board(incoming).unwrap();

        assert_eq!(board.columns().len(), 8);
        assert_eq!(board.task_count(), 1);
        let column = board.column("column-2").unwrap();
        assert_eq!(column.title, "Applied");
        assert_eq!(column.tasks[0].column_id, "column-2");
        assert_eq!(store.persistence().load(), *board);
    }
}
