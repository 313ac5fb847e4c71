//! Tests for task identity resolution: id, legacy number, and free-text name
//! references, plus the documented duplicate-name tie-break.

use kanban_store::error::StoreError;
use kanban_store::resolve::{ResolveScope, TaskReference};
use kanban_store::store::Store;
use kanban_store::types::{CreateBoardRequest, CreateTaskRequest};

fn setup_store() -> Store {
    Store::new()
}

fn board_request(name: &str) -> CreateBoardRequest {
    CreateBoardRequest {
        name: name.to_string(),
        description: None,
        owner_id: "u1".to_string(),
        is_private: false,
        columns: None,
    }
}

fn task_request(name: &str, board_id: &str) -> CreateTaskRequest {
    CreateTaskRequest {
        name: name.to_string(),
        description: None,
        board_id: board_id.to_string(),
        column_id: None,
        priority: None,
        due_date: None,
        assignee_id: None,
        tags: vec![],
    }
}

mod by_id {
    use super::*;

    #[test]
    fn resolves_directly() {
        let store = setup_store();
        let board = store.create_board(board_request("Sprint1")).unwrap();
        let task = store.create_task(task_request("Fix bug", &board.id)).unwrap();

        let found = store
            .resolve_task(
                &TaskReference::ById(task.id.clone()),
                &ResolveScope::AllBoards,
            )
            .unwrap();

        assert_eq!(found.id, task.id);
    }

    #[test]
    fn respects_board_scope() {
        let store = setup_store();
        let board = store.create_board(board_request("Sprint1")).unwrap();
        let other = store.create_board(board_request("Other")).unwrap();
        let task = store.create_task(task_request("Fix bug", &board.id)).unwrap();

        let result = store.resolve_task(
            &TaskReference::ById(task.id.clone()),
            &ResolveScope::Board(other.id.clone()),
        );

        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }
}

mod by_number {
    use super::*;

    #[test]
    fn resolves_within_board() {
        let store = setup_store();
        let board = store.create_board(board_request("Sprint1")).unwrap();
        store.create_task(task_request("first", &board.id)).unwrap();
        let second = store.create_task(task_request("second", &board.id)).unwrap();

        let found = store
            .resolve_task(
                &TaskReference::ByNumber(2),
                &ResolveScope::Board(board.id.clone()),
            )
            .unwrap();

        assert_eq!(found.id, second.id);
    }

    #[test]
    fn collision_across_boards_is_ambiguous() {
        let store = setup_store();
        let a = store.create_board(board_request("A")).unwrap();
        let b = store.create_board(board_request("B")).unwrap();
        store.create_task(task_request("on a", &a.id)).unwrap();
        store.create_task(task_request("on b", &b.id)).unwrap();

        let result = store.resolve_task(&TaskReference::ByNumber(1), &ResolveScope::AllBoards);

        assert!(matches!(
            result,
            Err(StoreError::AmbiguousMatch { count: 2, .. })
        ));
    }

    #[test]
    fn unknown_number_is_not_found() {
        let store = setup_store();
        let board = store.create_board(board_request("Sprint1")).unwrap();
        store.create_task(task_request("only", &board.id)).unwrap();

        let result = store.resolve_task(
            &TaskReference::ByNumber(99),
            &ResolveScope::Board(board.id.clone()),
        );

        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn numeric_text_never_falls_back_to_name_matching() {
        let store = setup_store();
        let board = store.create_board(board_request("Sprint1")).unwrap();
        // A task literally named "42", holding number 1.
        store.create_task(task_request("42", &board.id)).unwrap();

        let reference = TaskReference::parse("42");
        assert_eq!(reference, TaskReference::ByNumber(42));

        let result = store.resolve_task(&reference, &ResolveScope::Board(board.id.clone()));
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }
}

mod by_name {
    use super::*;

    #[test]
    fn matching_ignores_case_and_diacritics() {
        let store = setup_store();
        let board = store.create_board(board_request("Sprint1")).unwrap();
        let task = store.create_task(task_request("Déploy API", &board.id)).unwrap();

        let found = store
            .resolve_task(
                &TaskReference::ByName("deploy api".to_string()),
                &ResolveScope::Board(board.id.clone()),
            )
            .unwrap();

        assert_eq!(found.id, task.id);
    }

    #[test]
    fn duplicate_names_resolve_to_first_in_column_order() {
        let store = setup_store();
        let board = store.create_board(board_request("Sprint1")).unwrap();
        let in_todo = store.create_task(task_request("Deploy", &board.id)).unwrap();
        let in_progress = store.create_task(task_request("Deploy", &board.id)).unwrap();
        store
            .move_task(&in_progress.id, "inprogress", None)
            .unwrap();

        let found = store
            .resolve_task(
                &TaskReference::ByName("Deploy".to_string()),
                &ResolveScope::Board(board.id.clone()),
            )
            .unwrap();

        // Todo precedes InProgress in the traversal, so the Todo copy wins.
        assert_eq!(found.id, in_todo.id);
    }

    #[test]
    fn tie_break_follows_the_traversal_after_moves() {
        let store = setup_store();
        let board = store.create_board(board_request("Sprint1")).unwrap();
        let first = store.create_task(task_request("Deploy", &board.id)).unwrap();
        let second = store.create_task(task_request("Deploy", &board.id)).unwrap();
        store.move_task(&second.id, "inprogress", None).unwrap();
        store.move_task(&first.id, "done", None).unwrap();

        let found = store
            .resolve_task(
                &TaskReference::ByName("Deploy".to_string()),
                &ResolveScope::Board(board.id.clone()),
            )
            .unwrap();

        // Todo is now empty; the InProgress copy precedes the Done copy.
        assert_eq!(found.id, second.id);
    }

    #[test]
    fn unknown_name_is_not_found() {
        let store = setup_store();
        let board = store.create_board(board_request("Sprint1")).unwrap();

        let result = store.resolve_task(
            &TaskReference::ByName("ghost".to_string()),
            &ResolveScope::Board(board.id.clone()),
        );

        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn all_boards_scope_walks_boards_in_creation_order() {
        let store = setup_store();
        let older = store.create_board(board_request("Older")).unwrap();
        let newer = store.create_board(board_request("Newer")).unwrap();
        let on_older = store.create_task(task_request("Deploy", &older.id)).unwrap();
        store.create_task(task_request("Deploy", &newer.id)).unwrap();

        let found = store
            .resolve_task(
                &TaskReference::ByName("Deploy".to_string()),
                &ResolveScope::AllBoards,
            )
            .unwrap();

        assert_eq!(found.id, on_older.id);
    }
}
