//! Read-only projections over the store.
//!
//! Plain scans computed at call time, no caching layer. Each call takes the
//! lock once, so a reader observes either the pre- or post-state of any
//! concurrent mutation, never an intermediate one. Everything clones out;
//! callers never hold references into the store.

use crate::store::Store;
use crate::types::{Board, Stats, Subtask, Task, TaskStatus, User};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

impl Store {
    /// Fetch a board by id.
    pub fn get_board(&self, board_id: &str) -> Option<Board> {
        self.with_inner(|inner| inner.boards.get(board_id).cloned())
    }

    /// Fetch a task by id.
    pub fn get_task(&self, task_id: &str) -> Option<Task> {
        self.with_inner(|inner| inner.tasks.get(task_id).cloned())
    }

    /// Fetch a subtask by id.
    pub fn get_subtask(&self, subtask_id: &str) -> Option<Subtask> {
        self.with_inner(|inner| inner.subtasks.get(subtask_id).cloned())
    }

    /// Fetch a user by id.
    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.with_inner(|inner| inner.users.get(user_id).cloned())
    }

    /// All tasks on a board, in column traversal order. Empty for an unknown
    /// board.
    pub fn tasks_by_board(&self, board_id: &str) -> Vec<Task> {
        self.with_inner(|inner| {
            let Some(board) = inner.boards.get(board_id) else {
                return Vec::new();
            };
            board
                .columns
                .iter()
                .flat_map(|c| c.task_ids.iter())
                .filter_map(|id| inner.tasks.get(id))
                .cloned()
                .collect()
        })
    }

    /// Tasks in one column, in the column's ordering. Empty for an unknown
    /// board or column.
    pub fn tasks_by_column(&self, board_id: &str, column_id: &str) -> Vec<Task> {
        self.with_inner(|inner| {
            let Some(column) = inner
                .boards
                .get(board_id)
                .and_then(|b| b.column(column_id))
            else {
                return Vec::new();
            };
            column
                .task_ids
                .iter()
                .filter_map(|id| inner.tasks.get(id))
                .cloned()
                .collect()
        })
    }

    /// All tasks assigned to a user, across boards, oldest first.
    pub fn tasks_by_assignee(&self, user_id: &str) -> Vec<Task> {
        self.with_inner(|inner| {
            let mut tasks: Vec<Task> = inner
                .tasks
                .values()
                .filter(|t| t.assignees.iter().any(|a| a == user_id))
                .cloned()
                .collect();
            tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
            tasks
        })
    }

    /// Boards the user owns or is a member of, oldest first.
    pub fn boards_by_member(&self, user_id: &str) -> Vec<Board> {
        self.with_inner(|inner| {
            let mut boards: Vec<Board> = inner
                .boards
                .values()
                .filter(|b| b.is_member(user_id))
                .cloned()
                .collect();
            boards.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
            boards
        })
    }

    /// Subtasks of a task, in the parent's checklist order. Empty for an
    /// unknown task.
    pub fn subtasks_by_parent(&self, task_id: &str) -> Vec<Subtask> {
        self.with_inner(|inner| {
            let Some(task) = inner.tasks.get(task_id) else {
                return Vec::new();
            };
            task.subtask_ids
                .iter()
                .filter_map(|id| inner.subtasks.get(id))
                .cloned()
                .collect()
        })
    }

    /// Registered users of a board: owner first, then members in join order.
    /// Ids that no longer resolve to a registered user are filtered out.
    pub fn users_by_board(&self, board_id: &str) -> Vec<User> {
        self.with_inner(|inner| {
            let Some(board) = inner.boards.get(board_id) else {
                return Vec::new();
            };
            let mut seen = Vec::new();
            let mut users = Vec::new();
            for id in std::iter::once(&board.owner_id).chain(board.member_ids.iter()) {
                if seen.contains(id) {
                    continue;
                }
                seen.push(id.clone());
                if let Some(user) = inner.users.get(id) {
                    users.push(user.clone());
                }
            }
            users
        })
    }

    /// Unfinished tasks whose due date has passed, across boards, most
    /// overdue first. Feeds the host bot's due-reminder flow.
    pub fn overdue_tasks(&self, now: DateTime<Utc>) -> Vec<Task> {
        self.with_inner(|inner| {
            let mut tasks: Vec<Task> = inner
                .tasks
                .values()
                .filter(|t| t.status != TaskStatus::Done)
                .filter(|t| t.due_date.is_some_and(|due| due < now))
                .cloned()
                .collect();
            tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.id.cmp(&b.id)));
            tasks
        })
    }

    /// Aggregate counts with task breakdowns by status and priority.
    pub fn stats(&self) -> Stats {
        self.with_inner(|inner| {
            let mut tasks_by_status: HashMap<String, i64> = HashMap::new();
            let mut tasks_by_priority: HashMap<String, i64> = HashMap::new();
            for task in inner.tasks.values() {
                *tasks_by_status
                    .entry(task.status.as_str().to_string())
                    .or_insert(0) += 1;
                *tasks_by_priority
                    .entry(task.priority.as_str().to_string())
                    .or_insert(0) += 1;
            }
            Stats {
                total_boards: inner.boards.len() as i64,
                total_tasks: inner.tasks.len() as i64,
                total_users: inner.users.len() as i64,
                tasks_by_status,
                tasks_by_priority,
            }
        })
    }
}
