//! Task operations: CRUD, assignment, and the column-synchronized move.

use super::{Store, new_id, now};
use crate::error::{StoreError, StoreResult};
use crate::types::{CreateTaskRequest, Task, TaskStatus, UpdateTaskRequest};
use tracing::debug;

impl Store {
    /// Create a task in the given column (default: the board's first column)
    /// and append it to that column's ordering.
    pub fn create_task(&self, req: CreateTaskRequest) -> StoreResult<Task> {
        self.with_inner_mut(|inner| {
            inner.validate_name("name", &req.name)?;

            let board = inner.board(&req.board_id)?;
            let column_id = match &req.column_id {
                Some(id) => board
                    .column(id)
                    .map(|c| c.id.clone())
                    .ok_or_else(|| StoreError::column_not_found(id))?,
                // First column is the default landing spot.
                None => board
                    .columns
                    .first()
                    .map(|c| c.id.clone())
                    .ok_or_else(|| StoreError::invalid_op("board has no columns"))?,
            };

            let board = inner.board_mut(&req.board_id)?;
            let task_number = board.next_task_number;
            board.next_task_number += 1;

            let ts = now();
            let task = Task {
                id: new_id(),
                name: req.name,
                description: req.description,
                status: TaskStatus::for_column(&column_id).unwrap_or(TaskStatus::Todo),
                priority: req.priority.unwrap_or_default(),
                board_id: req.board_id.clone(),
                column_id: column_id.clone(),
                due_date: req.due_date,
                task_number: Some(task_number),
                assignees: req.assignee_id.into_iter().collect(),
                tags: req.tags,
                subtask_ids: Vec::new(),
                created_at: ts,
                updated_at: ts,
            };

            let column = board
                .column_mut(&column_id)
                .ok_or_else(|| StoreError::column_not_found(&column_id))?;
            column.task_ids.push(task.id.clone());
            board.updated_at = ts;

            inner.tasks.insert(task.id.clone(), task.clone());
            debug!(task_id = %task.id, board_id = %task.board_id, "task created");
            Ok(task)
        })
    }

    /// Apply a patch to a task. `None` fields are left untouched. Status is
    /// not patchable here; `move_task` owns status transitions.
    pub fn update_task(&self, task_id: &str, patch: UpdateTaskRequest) -> StoreResult<Task> {
        self.with_inner_mut(|inner| {
            if let Some(name) = &patch.name {
                inner.validate_name("name", name)?;
            }
            let task = inner
                .tasks
                .get_mut(task_id)
                .ok_or_else(|| StoreError::task_not_found(task_id))?;

            if let Some(name) = patch.name {
                task.name = name;
            }
            if let Some(description) = patch.description {
                task.description = Some(description);
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }
            if let Some(due_date) = patch.due_date {
                task.due_date = Some(due_date);
            }
            if let Some(tags) = patch.tags {
                task.tags = tags;
            }
            task.updated_at = now();
            Ok(task.clone())
        })
    }

    /// Move a task to another column on its board, inserting at `position`
    /// (default: append). The column membership edit, the task's `column_id`
    /// pointer, and the legacy status sync happen in one critical section:
    /// the operation either fully applies or fails without touching anything.
    ///
    /// Cross-board moves are rejected; a task changes boards only by being
    /// recreated.
    pub fn move_task(
        &self,
        task_id: &str,
        new_column_id: &str,
        position: Option<usize>,
    ) -> StoreResult<Task> {
        self.with_inner_mut(|inner| {
            let task = inner.task(task_id)?;
            let board_id = task.board_id.clone();
            let source_column_id = task.column_id.clone();

            let board = inner.board(&board_id)?;
            if board.column(new_column_id).is_none() {
                // Distinguish a column on some other board from one that
                // does not exist at all.
                let exists_elsewhere = inner
                    .boards
                    .values()
                    .any(|b| b.id != board_id && b.column(new_column_id).is_some());
                if exists_elsewhere {
                    return Err(StoreError::invalid_op(format!(
                        "column {new_column_id} belongs to a different board than task {task_id}"
                    )));
                }
                return Err(StoreError::column_not_found(new_column_id));
            }
            if board.column(&source_column_id).is_none() {
                return Err(StoreError::column_not_found(&source_column_id));
            }

            // All lookups done; mutate.
            let ts = now();
            let board = inner.board_mut(&board_id)?;
            {
                let source = board
                    .column_mut(&source_column_id)
                    .ok_or_else(|| StoreError::column_not_found(&source_column_id))?;
                source.task_ids.retain(|id| id != task_id);
            }
            {
                let destination = board
                    .column_mut(new_column_id)
                    .ok_or_else(|| StoreError::column_not_found(new_column_id))?;
                let at = position
                    .unwrap_or(destination.task_ids.len())
                    .min(destination.task_ids.len());
                destination.task_ids.insert(at, task_id.to_string());
            }
            board.updated_at = ts;

            let task = inner
                .tasks
                .get_mut(task_id)
                .ok_or_else(|| StoreError::task_not_found(task_id))?;
            task.column_id = new_column_id.to_string();
            if let Some(status) = TaskStatus::for_column(new_column_id) {
                task.status = status;
            }
            task.updated_at = ts;

            debug!(
                task_id,
                from = %source_column_id,
                to = new_column_id,
                "task moved"
            );
            Ok(task.clone())
        })
    }

    /// Add an assignee. Idempotent.
    pub fn assign_task(&self, task_id: &str, user_id: &str) -> StoreResult<Task> {
        self.with_inner_mut(|inner| {
            let task = inner
                .tasks
                .get_mut(task_id)
                .ok_or_else(|| StoreError::task_not_found(task_id))?;
            if !task.assignees.iter().any(|a| a == user_id) {
                task.assignees.push(user_id.to_string());
                task.updated_at = now();
            }
            Ok(task.clone())
        })
    }

    /// Remove an assignee. Idempotent.
    pub fn unassign_task(&self, task_id: &str, user_id: &str) -> StoreResult<Task> {
        self.with_inner_mut(|inner| {
            let task = inner
                .tasks
                .get_mut(task_id)
                .ok_or_else(|| StoreError::task_not_found(task_id))?;
            let before = task.assignees.len();
            task.assignees.retain(|a| a != user_id);
            if task.assignees.len() != before {
                task.updated_at = now();
            }
            Ok(task.clone())
        })
    }

    /// Delete a task: unlink it from its column's ordering, then cascade to
    /// its subtasks.
    pub fn delete_task(&self, task_id: &str) -> StoreResult<()> {
        self.with_inner_mut(|inner| {
            let task = inner.task(task_id)?;
            let board_id = task.board_id.clone();
            let column_id = task.column_id.clone();

            if let Some(board) = inner.boards.get_mut(&board_id) {
                if let Some(column) = board.column_mut(&column_id) {
                    column.task_ids.retain(|id| id != task_id);
                }
                board.updated_at = now();
            }

            inner.subtasks.retain(|_, s| s.parent_task_id != task_id);
            inner.tasks.remove(task_id);

            debug!(task_id, "task deleted");
            Ok(())
        })
    }
}
