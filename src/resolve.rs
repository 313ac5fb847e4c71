//! Task identity resolution for legacy free-text commands.
//!
//! A task may be referenced three ways: by its generated id, by its per-board
//! legacy sequence number, or by its display name. The resolver tries them in
//! that order of strength. Name matching is case- and diacritic-insensitive,
//! and duplicate names are settled by a documented tie-break rather than an
//! error: the first match in the board's column traversal order wins
//! (Todo, then InProgress, then Done on a canonically seeded board).

use crate::error::{StoreError, StoreResult};
use crate::store::{self, Store, StoreInner};
use crate::types::{Board, Task};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// A parsed task reference, tagged by how it identifies the task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskReference {
    /// A generated store id.
    ById(String),
    /// A legacy per-board sequence number.
    ByNumber(i64),
    /// A free-text display name.
    ByName(String),
}

impl TaskReference {
    /// Classify raw command text: store-id format first, then integer, then
    /// free text.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if store::is_id_format(raw) {
            TaskReference::ById(raw.to_string())
        } else if let Ok(n) = raw.parse::<i64>() {
            TaskReference::ByNumber(n)
        } else {
            TaskReference::ByName(raw.to_string())
        }
    }

    fn describe(&self) -> String {
        match self {
            TaskReference::ById(id) => id.clone(),
            TaskReference::ByNumber(n) => n.to_string(),
            TaskReference::ByName(name) => name.clone(),
        }
    }
}

/// Where to look for the task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveScope {
    /// A single board, by id.
    Board(String),
    /// Every board in the store.
    AllBoards,
}

/// Lowercase and strip combining marks, so "Déploy" and "deploy" compare
/// equal. Mirrors what the legacy bot did with lodash `deburr`.
fn normalize_name(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Boards in scope, in deterministic traversal order (creation time, then id
/// for the all-boards scope).
fn boards_in_scope<'a>(inner: &'a StoreInner, scope: &ResolveScope) -> StoreResult<Vec<&'a Board>> {
    match scope {
        ResolveScope::Board(board_id) => Ok(vec![inner.board(board_id)?]),
        ResolveScope::AllBoards => {
            let mut boards: Vec<&Board> = inner.boards.values().collect();
            boards.sort_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            });
            Ok(boards)
        }
    }
}

/// Tasks of one board in column traversal order: columns in display order,
/// tasks in each column's ordering.
fn tasks_in_traversal_order<'a>(inner: &'a StoreInner, board: &Board) -> Vec<&'a Task> {
    board
        .columns
        .iter()
        .flat_map(|column| column.task_ids.iter())
        .filter_map(|task_id| inner.tasks.get(task_id))
        .collect()
}

impl Store {
    /// Resolve a reference to a single task within the scope.
    ///
    /// - `ById`: direct lookup; `NotFound` if absent or outside the scope.
    /// - `ByNumber`: scan for a matching legacy number; `AmbiguousMatch` if
    ///   several boards reuse it in the all-boards scope.
    /// - `ByName`: normalized comparison; with duplicates, the first match in
    ///   column traversal order wins.
    ///
    /// Pure read over the store's current state; no mutation.
    pub fn resolve_task(
        &self,
        reference: &TaskReference,
        scope: &ResolveScope,
    ) -> StoreResult<Task> {
        self.with_inner(|inner| match reference {
            TaskReference::ById(id) => {
                let task = inner.task(id)?;
                if let ResolveScope::Board(board_id) = scope {
                    if &task.board_id != board_id {
                        return Err(StoreError::task_not_found(id));
                    }
                }
                Ok(task.clone())
            }
            TaskReference::ByNumber(n) => {
                let mut matches: Vec<&Task> = Vec::new();
                for board in boards_in_scope(inner, scope)? {
                    matches.extend(
                        tasks_in_traversal_order(inner, board)
                            .into_iter()
                            .filter(|t| t.task_number == Some(*n)),
                    );
                }
                match matches.as_slice() {
                    [] => Err(StoreError::task_not_found(reference.describe())),
                    [task] => Ok((*task).clone()),
                    several => Err(StoreError::ambiguous(reference.describe(), several.len())),
                }
            }
            TaskReference::ByName(name) => {
                let wanted = normalize_name(name);
                for board in boards_in_scope(inner, scope)? {
                    for task in tasks_in_traversal_order(inner, board) {
                        if normalize_name(&task.name) == wanted {
                            return Ok(task.clone());
                        }
                    }
                }
                Err(StoreError::task_not_found(reference.describe()))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_classifies_uuid_number_and_name() {
        let id = "0192c7a4-7f4e-7c3a-9b1e-2a6d43f0a111";
        assert_eq!(
            TaskReference::parse(id),
            TaskReference::ById(id.to_string())
        );
        assert_eq!(TaskReference::parse("42"), TaskReference::ByNumber(42));
        assert_eq!(
            TaskReference::parse("Fix bug"),
            TaskReference::ByName("Fix bug".to_string())
        );
    }

    #[test]
    fn normalization_is_case_and_diacritic_insensitive() {
        assert_eq!(normalize_name("Déploy"), normalize_name("deploy"));
        assert_eq!(normalize_name("CAFÉ"), normalize_name("cafe"));
        assert_ne!(normalize_name("deploy"), normalize_name("deploys"));
    }
}
