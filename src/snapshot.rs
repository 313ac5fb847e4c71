//! Versioned snapshot codec.
//!
//! The snapshot is a flat picture of the four entity collections, sorted so
//! that structurally equal stores serialize identically. An external
//! persistence collaborator decides where the blob lives and when to save or
//! load it; this module only encodes, decodes, and re-validates.
//!
//! The load path is strict: a snapshot that fails any cross-reference
//! invariant is rejected whole with `CorruptSnapshot` naming the first
//! violation. A partially consistent store must never start serving commands.

use crate::error::{StoreError, StoreResult};
use crate::store::Store;
use crate::types::{Board, Subtask, Task, TaskStatus, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Current snapshot format version. Bump on any shape change.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A flat, versioned copy of the entire store state. Columns ride embedded
/// in their board; all timestamps serialize as RFC 3339 text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub boards: Vec<Board>,
    pub tasks: Vec<Task>,
    pub subtasks: Vec<Subtask>,
    pub users: Vec<User>,
}

impl Snapshot {
    /// Encode to a JSON blob for the persistence collaborator.
    pub fn to_json(&self) -> StoreResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StoreError::corrupt(format!("encode failed: {e}")))
    }

    /// Decode from a JSON blob. Shape errors surface as `CorruptSnapshot`;
    /// referential validation happens separately on restore.
    pub fn from_json(blob: &str) -> StoreResult<Self> {
        serde_json::from_str(blob).map_err(|e| StoreError::corrupt(format!("decode failed: {e}")))
    }

    /// Re-check every cross-reference invariant of the data model. Returns
    /// the first violation found.
    pub fn validate(&self) -> StoreResult<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(StoreError::corrupt(format!(
                "version {} is not the supported version {}",
                self.version, SNAPSHOT_VERSION
            )));
        }

        let boards = unique_by_id(&self.boards, |b: &Board| &b.id, "board")?;
        let tasks = unique_by_id(&self.tasks, |t: &Task| &t.id, "task")?;
        let subtasks = unique_by_id(&self.subtasks, |s: &Subtask| &s.id, "subtask")?;
        unique_by_id(&self.users, |u: &User| &u.id, "user")?;

        // Which column (if any) lists each task id, for the exactly-once check.
        let mut membership: HashMap<&str, &str> = HashMap::new();

        for board in &self.boards {
            if board.columns.is_empty() {
                return Err(StoreError::corrupt(format!(
                    "board {} has no columns",
                    board.id
                )));
            }
            let mut column_ids = HashSet::new();
            let mut positions = HashSet::new();
            for column in &board.columns {
                if !column_ids.insert(column.id.as_str()) {
                    return Err(StoreError::corrupt(format!(
                        "board {} repeats column id {}",
                        board.id, column.id
                    )));
                }
                if !positions.insert(column.position) {
                    return Err(StoreError::corrupt(format!(
                        "board {} repeats column position {}",
                        board.id, column.position
                    )));
                }
                if column.board_id != board.id {
                    return Err(StoreError::corrupt(format!(
                        "column {} claims board {} but is embedded in board {}",
                        column.id, column.board_id, board.id
                    )));
                }
                for task_id in &column.task_ids {
                    let task = tasks.get(task_id.as_str()).ok_or_else(|| {
                        StoreError::corrupt(format!(
                            "column {} lists unknown task {}",
                            column.id, task_id
                        ))
                    })?;
                    if membership.insert(task_id.as_str(), column.id.as_str()).is_some() {
                        return Err(StoreError::corrupt(format!(
                            "task {task_id} appears in more than one column"
                        )));
                    }
                    if task.column_id != column.id || task.board_id != board.id {
                        return Err(StoreError::corrupt(format!(
                            "task {} is listed by column {} but points at column {}",
                            task_id, column.id, task.column_id
                        )));
                    }
                }
            }
        }

        let mut subtask_owner: HashMap<&str, &str> = HashMap::new();
        for task in &self.tasks {
            let board = boards.get(task.board_id.as_str()).ok_or_else(|| {
                StoreError::corrupt(format!(
                    "task {} references unknown board {}",
                    task.id, task.board_id
                ))
            })?;
            if board.column(&task.column_id).is_none() {
                return Err(StoreError::corrupt(format!(
                    "task {} references unknown column {}",
                    task.id, task.column_id
                )));
            }
            if !membership.contains_key(task.id.as_str()) {
                return Err(StoreError::corrupt(format!(
                    "task {} is missing from its column's ordering",
                    task.id
                )));
            }
            if let Some(expected) = TaskStatus::for_column(&task.column_id) {
                if task.status != expected {
                    return Err(StoreError::corrupt(format!(
                        "task {} has status {} but sits in column {}",
                        task.id,
                        task.status.as_str(),
                        task.column_id
                    )));
                }
            }
            for subtask_id in &task.subtask_ids {
                let subtask = subtasks.get(subtask_id.as_str()).ok_or_else(|| {
                    StoreError::corrupt(format!(
                        "task {} lists unknown subtask {}",
                        task.id, subtask_id
                    ))
                })?;
                if subtask.parent_task_id != task.id {
                    return Err(StoreError::corrupt(format!(
                        "subtask {} is listed by task {} but points at task {}",
                        subtask_id, task.id, subtask.parent_task_id
                    )));
                }
                if subtask_owner.insert(subtask_id.as_str(), task.id.as_str()).is_some() {
                    return Err(StoreError::corrupt(format!(
                        "subtask {subtask_id} appears under more than one task"
                    )));
                }
            }
        }

        for subtask in &self.subtasks {
            if !tasks.contains_key(subtask.parent_task_id.as_str()) {
                return Err(StoreError::corrupt(format!(
                    "subtask {} references unknown task {}",
                    subtask.id, subtask.parent_task_id
                )));
            }
            if !subtask_owner.contains_key(subtask.id.as_str()) {
                return Err(StoreError::corrupt(format!(
                    "subtask {} is missing from its parent's ordering",
                    subtask.id
                )));
            }
        }

        Ok(())
    }
}

/// Index a slice by id, rejecting duplicates.
fn unique_by_id<'a, T, F>(
    items: &'a [T],
    id_of: F,
    kind: &str,
) -> StoreResult<HashMap<&'a str, &'a T>>
where
    F: Fn(&'a T) -> &'a String,
{
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        let id = id_of(item);
        if map.insert(id.as_str(), item).is_some() {
            return Err(StoreError::corrupt(format!("duplicate {kind} id {id}")));
        }
    }
    Ok(map)
}

impl Store {
    /// Capture the whole store as a snapshot. Lists are sorted by creation
    /// time then id (users by id) so equal stores produce equal snapshots.
    pub fn snapshot(&self) -> Snapshot {
        self.with_inner(|inner| {
            let mut boards: Vec<Board> = inner.boards.values().cloned().collect();
            boards.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
            let mut tasks: Vec<Task> = inner.tasks.values().cloned().collect();
            tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
            let mut subtasks: Vec<Subtask> = inner.subtasks.values().cloned().collect();
            subtasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
            let mut users: Vec<User> = inner.users.values().cloned().collect();
            users.sort_by(|a, b| a.id.cmp(&b.id));

            Snapshot {
                version: SNAPSHOT_VERSION,
                saved_at: crate::store::now(),
                boards,
                tasks,
                subtasks,
                users,
            }
        })
    }

    /// Replace this store's contents with a validated snapshot. On any
    /// validation failure the store is untouched.
    pub fn restore(&self, snapshot: &Snapshot) -> StoreResult<()> {
        snapshot.validate()?;

        self.with_inner_mut(|inner| {
            inner.boards = snapshot
                .boards
                .iter()
                .map(|b| (b.id.clone(), b.clone()))
                .collect();
            inner.tasks = snapshot
                .tasks
                .iter()
                .map(|t| (t.id.clone(), t.clone()))
                .collect();
            inner.subtasks = snapshot
                .subtasks
                .iter()
                .map(|s| (s.id.clone(), s.clone()))
                .collect();
            inner.users = snapshot
                .users
                .iter()
                .map(|u| (u.id.clone(), u.clone()))
                .collect();
        });

        info!(
            boards = snapshot.boards.len(),
            tasks = snapshot.tasks.len(),
            "store restored from snapshot"
        );
        Ok(())
    }

    /// Build a fresh store from a snapshot, with default configuration.
    pub fn from_snapshot(snapshot: &Snapshot) -> StoreResult<Self> {
        let store = Store::new();
        store.restore(snapshot)?;
        Ok(store)
    }
}
