//! Board operations: CRUD, membership, and column management.

use super::{Store, new_id, now};
use crate::error::{StoreError, StoreResult};
use crate::types::{
    Board, BoardSettings, Column, CreateBoardRequest, TaskStatus, UpdateBoardRequest,
};
use tracing::debug;

impl Store {
    /// Create a board. Seeds the configured canonical columns when the
    /// request names none, and makes the owner the sole initial member.
    pub fn create_board(&self, req: CreateBoardRequest) -> StoreResult<Board> {
        self.with_inner_mut(|inner| {
            inner.validate_name("name", &req.name)?;
            if req.owner_id.trim().is_empty() {
                return Err(StoreError::validation("owner_id", "must not be empty"));
            }

            let board_id = new_id();
            let columns = match &req.columns {
                Some(names) => {
                    if names.is_empty() {
                        return Err(StoreError::validation(
                            "columns",
                            "a board needs at least one column",
                        ));
                    }
                    for name in names {
                        inner.validate_name("columns", name)?;
                    }
                    names
                        .iter()
                        .enumerate()
                        .map(|(i, name)| Column {
                            id: new_id(),
                            name: name.clone(),
                            board_id: board_id.clone(),
                            position: i as i32,
                            task_ids: Vec::new(),
                        })
                        .collect()
                }
                None => inner
                    .config
                    .seed_columns
                    .iter()
                    .enumerate()
                    .map(|(i, seed)| Column {
                        id: seed.id.clone(),
                        name: seed.name.clone(),
                        board_id: board_id.clone(),
                        position: i as i32,
                        task_ids: Vec::new(),
                    })
                    .collect(),
            };

            let ts = now();
            let board = Board {
                id: board_id.clone(),
                name: req.name,
                description: req.description,
                owner_id: req.owner_id.clone(),
                member_ids: vec![req.owner_id],
                is_private: req.is_private,
                columns,
                settings: BoardSettings::default(),
                next_task_number: 1,
                created_at: ts,
                updated_at: ts,
            };

            inner.boards.insert(board_id.clone(), board.clone());
            debug!(board_id = %board_id, "board created");
            Ok(board)
        })
    }

    /// Apply a patch to a board. `None` fields are left untouched.
    pub fn update_board(&self, board_id: &str, patch: UpdateBoardRequest) -> StoreResult<Board> {
        self.with_inner_mut(|inner| {
            if let Some(name) = &patch.name {
                inner.validate_name("name", name)?;
            }
            let board = inner.board_mut(board_id)?;

            if let Some(name) = patch.name {
                board.name = name;
            }
            if let Some(description) = patch.description {
                board.description = Some(description);
            }
            if let Some(is_private) = patch.is_private {
                board.is_private = is_private;
            }
            if let Some(settings) = patch.settings {
                board.settings = settings;
            }
            board.updated_at = now();
            Ok(board.clone())
        })
    }

    /// Delete a board and cascade to its tasks and their subtasks.
    /// Users are never deleted by a board cascade.
    pub fn delete_board(&self, board_id: &str) -> StoreResult<()> {
        self.with_inner_mut(|inner| {
            if !inner.boards.contains_key(board_id) {
                return Err(StoreError::board_not_found(board_id));
            }

            let task_ids: Vec<String> = inner
                .tasks
                .values()
                .filter(|t| t.board_id == board_id)
                .map(|t| t.id.clone())
                .collect();

            for task_id in &task_ids {
                inner.subtasks.retain(|_, s| s.parent_task_id != *task_id);
                inner.tasks.remove(task_id);
            }
            inner.boards.remove(board_id);

            debug!(board_id, tasks = task_ids.len(), "board deleted");
            Ok(())
        })
    }

    /// Add a member. Idempotent: adding a present member is a no-op.
    pub fn add_member(&self, board_id: &str, user_id: &str) -> StoreResult<Board> {
        self.with_inner_mut(|inner| {
            let board = inner.board_mut(board_id)?;
            if !board.member_ids.iter().any(|m| m == user_id) {
                board.member_ids.push(user_id.to_string());
                board.updated_at = now();
                debug!(board_id, user_id, "member added");
            }
            Ok(board.clone())
        })
    }

    /// Remove a member. Idempotent: removing an absent member is a no-op.
    /// The owner stays a member through `Board::is_member` regardless.
    pub fn remove_member(&self, board_id: &str, user_id: &str) -> StoreResult<Board> {
        self.with_inner_mut(|inner| {
            let board = inner.board_mut(board_id)?;
            let before = board.member_ids.len();
            board.member_ids.retain(|m| m != user_id);
            if board.member_ids.len() != before {
                board.updated_at = now();
                debug!(board_id, user_id, "member removed");
            }
            Ok(board.clone())
        })
    }

    /// Append a new empty column to a board.
    pub fn add_column(&self, board_id: &str, name: &str) -> StoreResult<Column> {
        self.with_inner_mut(|inner| {
            inner.validate_name("name", name)?;
            let board = inner.board_mut(board_id)?;

            let position = board.columns.iter().map(|c| c.position).max().unwrap_or(-1) + 1;
            let column = Column {
                id: new_id(),
                name: name.to_string(),
                board_id: board_id.to_string(),
                position,
                task_ids: Vec::new(),
            };
            board.columns.push(column.clone());
            board.updated_at = now();
            debug!(board_id, column_id = %column.id, "column added");
            Ok(column)
        })
    }

    /// Rename a column.
    pub fn rename_column(
        &self,
        board_id: &str,
        column_id: &str,
        name: &str,
    ) -> StoreResult<Column> {
        self.with_inner_mut(|inner| {
            inner.validate_name("name", name)?;
            let board = inner.board_mut(board_id)?;
            let column = board
                .column_mut(column_id)
                .ok_or_else(|| StoreError::column_not_found(column_id))?;
            column.name = name.to_string();
            let column = column.clone();
            board.updated_at = now();
            Ok(column)
        })
    }

    /// Reorder a board's columns. `column_ids` must be exactly the board's
    /// current column ids; positions are recomputed from the new order.
    pub fn reorder_columns(&self, board_id: &str, column_ids: &[String]) -> StoreResult<Board> {
        self.with_inner_mut(|inner| {
            let board = inner.board_mut(board_id)?;

            let mut remaining: Vec<&str> = board.columns.iter().map(|c| c.id.as_str()).collect();
            for id in column_ids {
                match remaining.iter().position(|r| r == id) {
                    Some(i) => {
                        remaining.remove(i);
                    }
                    None => {
                        return Err(StoreError::invalid_op(format!(
                            "column {id} is not on board {board_id} or appears twice"
                        )));
                    }
                }
            }
            if !remaining.is_empty() {
                return Err(StoreError::invalid_op(format!(
                    "reorder must name every column; missing {}",
                    remaining.join(", ")
                )));
            }

            let mut reordered = Vec::with_capacity(column_ids.len());
            for (i, id) in column_ids.iter().enumerate() {
                let mut column = board
                    .columns
                    .iter()
                    .find(|c| &c.id == id)
                    .cloned()
                    .ok_or_else(|| StoreError::column_not_found(id))?;
                column.position = i as i32;
                reordered.push(column);
            }
            board.columns = reordered;
            board.updated_at = now();
            Ok(board.clone())
        })
    }

    /// Delete a column. Tasks it holds migrate to the board's first remaining
    /// column rather than being dropped; deleting the last column is rejected
    /// because a board's column sequence must stay non-empty.
    pub fn delete_column(&self, board_id: &str, column_id: &str) -> StoreResult<()> {
        self.with_inner_mut(|inner| {
            let board = inner.board(board_id)?;
            let removed_idx = board
                .columns
                .iter()
                .position(|c| c.id == column_id)
                .ok_or_else(|| StoreError::column_not_found(column_id))?;
            if board.columns.len() == 1 {
                return Err(StoreError::invalid_op(
                    "cannot delete a board's last column",
                ));
            }

            let destination_id = board
                .columns
                .iter()
                .find(|c| c.id != column_id)
                .map(|c| c.id.clone())
                .ok_or_else(|| StoreError::column_not_found(column_id))?;
            let migrated_status = TaskStatus::for_column(&destination_id);

            let board = inner.board_mut(board_id)?;
            let orphaned = std::mem::take(&mut board.columns[removed_idx].task_ids);
            board.columns.remove(removed_idx);
            let ts = now();
            {
                let destination = board
                    .column_mut(&destination_id)
                    .ok_or_else(|| StoreError::column_not_found(&destination_id))?;
                destination.task_ids.extend(orphaned.iter().cloned());
            }
            board.updated_at = ts;

            for task_id in &orphaned {
                if let Some(task) = inner.tasks.get_mut(task_id) {
                    task.column_id = destination_id.clone();
                    if let Some(status) = migrated_status {
                        task.status = status;
                    }
                    task.updated_at = ts;
                }
            }

            debug!(
                board_id,
                column_id,
                migrated = orphaned.len(),
                "column deleted"
            );
            Ok(())
        })
    }
}
