//! Integration tests for board projections and stats.

use jobtrackr::board::BoardStore;
use jobtrackr::board::query::{self, PriorityFilter, Projection, Query, StatusFilter, ViewMode};
use jobtrackr::persistence::MemoryStore;
use jobtrackr::types::{Priority, TaskFields};

/// Board with two wishlist cards and one applied card.
fn setup_board() -> BoardStore<MemoryStore> {
    let mut store = BoardStore::open(MemoryStore::new());
    store
        .add_task(
            "column-1",
            TaskFields::new()
                .with_company("Acme")
                .with_role("Backend Engineer")
                .with_priority(Priority::High)
                .with_tags("rust, remote"),
        )
        .unwrap();
    store
        .add_task(
            "column-1",
            TaskFields::new()
                .with_company("Zeta")
                .with_role("Designer")
                .with_priority(Priority::Low)
                .with_notes("Referred by Acme alumni"),
        )
        .unwrap();
    store
        .add_task(
            "column-2",
            TaskFields::new()
                .with_company("Initech")
                .with_role("Platform Engineer"),
        )
        .unwrap();
    store
}

fn board_companies(projection: &Projection) -> Vec<(String, Vec<String>)> {
    match projection {
        Projection::Board { columns } => columns
            .iter()
            .map(|c| {
                (
                    c.title.clone(),
                    c.tasks.iter().map(|t| t.company.clone()).collect(),
                )
            })
            .collect(),
        Projection::List { .. } => panic!("expected board projection"),
    }
}

fn list_companies(projection: &Projection) -> Vec<String> {
    match projection {
        Projection::List { tasks } => tasks.iter().map(|e| e.task.company.clone()).collect(),
        Projection::Board { .. } => panic!("expected list projection"),
    }
}

mod filter_tests {
    use super::*;

    #[test]
    fn text_and_priority_filters_combine() {
        let store = setup_board();

        // "acme" matches Acme by company and Zeta by notes; high keeps only Acme.
        let query = Query::new()
            .with_text("  ACME ")
            .with_priority(PriorityFilter::Only(Priority::High));
        let result = store.query(&query);

        let columns = board_companies(&result.projection);
        assert_eq!(columns.len(), 8);
        assert_eq!(columns[0], ("Wishlist".to_string(), vec!["Acme".to_string()]));
        assert!(columns[1..].iter().all(|(_, tasks)| tasks.is_empty()));
    }

    #[test]
    fn text_matches_notes_and_tags() {
        let store = setup_board();

        let by_notes = store.query(&Query::new().with_text("alumni").with_mode(ViewMode::List));
        assert_eq!(list_companies(&by_notes.projection), vec!["Zeta"]);

        let by_tag = store.query(&Query::new().with_text("REMOTE").with_mode(ViewMode::List));
        assert_eq!(list_companies(&by_tag.projection), vec!["Acme"]);
    }

    #[test]
    fn status_filter_in_board_mode_keeps_only_that_column() {
        let store = setup_board();

        let result = store.query(&Query::new().with_status(StatusFilter::Title("Applied".into())));

        assert_eq!(
            board_companies(&result.projection),
            vec![("Applied".to_string(), vec!["Initech".to_string()])]
        );
    }

    #[test]
    fn status_filter_in_list_mode_filters_tasks() {
        let store = setup_board();

        let result = store.query(
            &Query::new()
                .with_status(StatusFilter::Title("Wishlist".into()))
                .with_mode(ViewMode::List),
        );

        assert_eq!(list_companies(&result.projection), vec!["Acme", "Zeta"]);
        match &result.projection {
            Projection::List { tasks } => {
                assert!(tasks.iter().all(|e| e.status_title == "Wishlist"))
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn unknown_status_title_matches_nothing() {
        let store = setup_board();

        let result = store.query(&Query::new().with_status(StatusFilter::Title("Ghosted".into())));

        assert_eq!(result.projection.task_count(), 0);
        assert_eq!(result.stats.total, 3);
    }

    #[test]
    fn list_mode_preserves_board_order() {
        let store = setup_board();

        let result = store.query(&Query::new().with_mode(ViewMode::List));

        assert_eq!(list_companies(&result.projection), vec!["Acme", "Zeta", "Initech"]);
    }
}

mod stats_tests {
    use super::*;
    use jobtrackr::board::moves::MoveCommand;

    #[test]
    fn stats_ignore_filters() {
        let store = setup_board();

        let filtered = store.query(
            &Query::new()
                .with_text("nothing matches this")
                .with_priority(PriorityFilter::Only(Priority::Medium)),
        );

        assert_eq!(filtered.projection.task_count(), 0);
        assert_eq!(filtered.stats.total, 3);
        assert_eq!(filtered.stats.count_for("Wishlist"), 2);
        assert_eq!(filtered.stats.count_for("Applied"), 1);
        assert_eq!(filtered.stats.by_status.len(), 8);
    }

    #[test]
    fn stats_track_offers_and_accepted() {
        let mut store = setup_board();
        store
            .move_task(&MoveCommand::new("column-1", 0, "column-6", 0))
            .unwrap();
        store
            .move_task(&MoveCommand::new("column-1", 0, "column-7", 0))
            .unwrap();

        let stats = query::stats(&store.snapshot());

        assert_eq!(stats.offers, 1);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.total, 3);
    }
}

mod determinism_tests {
    use super::*;

    #[test]
    fn same_board_and_query_give_identical_output() {
        let store = setup_board();
        let query = Query::new()
            .with_text("engineer")
            .with_mode(ViewMode::List);

        let first = serde_json::to_vec(&store.query(&query)).unwrap();
        let second = serde_json::to_vec(&query::run(&store.snapshot(), &query)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn query_does_not_touch_the_board() {
        let store = setup_board();
        let before = store.snapshot();

        store.query(&Query::new().with_text("acme").with_mode(ViewMode::List));

        assert_eq!(*store.snapshot(), *before);
        assert_eq!(store.persistence().store().write_count(), 3);
    }
}
