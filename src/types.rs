//! Core entity types for the Kanban board store.
//!
//! Entities are plain serde records owned by the store; external collaborators
//! (command handlers, renderers, persistence) only ever see clones of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Fixed ids of the three canonical columns seeded on every new board.
/// Legacy free-text commands and status sync key off these.
pub const COLUMN_TODO: &str = "todo";
pub const COLUMN_IN_PROGRESS: &str = "inprogress";
pub const COLUMN_DONE: &str = "done";

/// Task workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    /// Status implied by occupying one of the three canonical columns.
    /// Returns `None` for custom columns, which carry no status semantics.
    pub fn for_column(column_id: &str) -> Option<Self> {
        match column_id {
            COLUMN_TODO => Some(TaskStatus::Todo),
            COLUMN_IN_PROGRESS => Some(TaskStatus::InProgress),
            COLUMN_DONE => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

/// Informational user role. Board-level authority is the board's `owner_id`,
/// not this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Owner,
    Admin,
    #[default]
    Member,
    Viewer,
}

/// UI theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

/// A named collection of ordered columns and member users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Chat-platform identity of the board owner. Implicitly a member.
    pub owner_id: String,
    /// Member user ids in join order. Contains the owner; never contains
    /// duplicates.
    pub member_ids: Vec<String>,
    pub is_private: bool,
    /// Ordered, embedded columns. Never empty.
    pub columns: Vec<Column>,
    pub settings: BoardSettings,
    /// Allocator for the per-board legacy task number.
    pub next_task_number: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// True iff `user_id` is the owner or an explicit member.
    pub fn is_member(&self, user_id: &str) -> bool {
        self.owner_id == user_id || self.member_ids.iter().any(|m| m == user_id)
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub(crate) fn column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }
}

/// Per-board behavior toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSettings {
    #[serde(default)]
    pub auto_archive_done: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default = "default_true")]
    pub allow_comments: bool,
    #[serde(default = "default_true")]
    pub due_reminders: bool,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            auto_archive_done: false,
            notifications_enabled: true,
            allow_comments: true,
            due_reminders: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// An ordered bucket of tasks within a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub name: String,
    pub board_id: String,
    /// Display order, unique within the board.
    pub position: i32,
    /// Ordered task ids. Every entry resolves to a task whose `column_id` is
    /// this column; no task id appears in more than one column.
    pub task_ids: Vec<String>,
}

/// A unit of work belonging to exactly one board and one column at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub board_id: String,
    pub column_id: String,
    pub due_date: Option<DateTime<Utc>>,
    /// Legacy per-board sequence number used by free-text command matching.
    pub task_number: Option<i64>,
    /// Assignee user ids, insertion-ordered, no duplicates.
    pub assignees: Vec<String>,
    pub tags: Vec<String>,
    /// Ordered subtask ids.
    pub subtask_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A checklist item owned by exactly one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub parent_task_id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A chat-platform user known to the store. Independent of any board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// External chat-platform identity.
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub permissions: UserPermissions,
    #[serde(default)]
    pub preferences: UserPreferences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPermissions {
    #[serde(default = "default_true")]
    pub can_create_boards: bool,
    #[serde(default = "default_true")]
    pub can_edit_tasks: bool,
    #[serde(default)]
    pub can_delete_tasks: bool,
    #[serde(default)]
    pub can_manage_users: bool,
}

impl Default for UserPermissions {
    fn default() -> Self {
        Self {
            can_create_boards: true,
            can_edit_tasks: true,
            can_delete_tasks: false,
            can_manage_users: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub notifications: bool,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::Auto,
            notifications: true,
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Entity kinds, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Board,
    Column,
    Task,
    Subtask,
    User,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Board => "board",
            EntityKind::Column => "column",
            EntityKind::Task => "task",
            EntityKind::Subtask => "subtask",
            EntityKind::User => "user",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Request payloads from command handlers
// =============================================================================

/// Input for creating a board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBoardRequest {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    #[serde(default)]
    pub is_private: bool,
    /// Column names, in order. When omitted the store seeds the canonical
    /// Todo/InProgress/Done columns.
    pub columns: Option<Vec<String>>,
}

/// Patch for an existing board. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBoardRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_private: Option<bool>,
    pub settings: Option<BoardSettings>,
}

/// Input for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub name: String,
    pub description: Option<String>,
    pub board_id: String,
    /// Target column. Defaults to the board's first column.
    pub column_id: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Patch for an existing task. Status is deliberately absent: status only
/// changes through `move_task`, which keeps it consistent with the column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
}

/// Input for creating a subtask under a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubtaskRequest {
    pub parent_task_id: String,
    pub title: String,
}

/// Input for registering or refreshing a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertUserRequest {
    pub id: String,
    pub username: String,
    pub role: Option<UserRole>,
    pub permissions: Option<UserPermissions>,
    pub preferences: Option<UserPreferences>,
}

/// Patch for an existing user. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub role: Option<UserRole>,
    pub permissions: Option<UserPermissions>,
    pub preferences: Option<UserPreferences>,
}

/// Aggregate statistics over the whole store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub total_boards: i64,
    pub total_tasks: i64,
    pub total_users: i64,
    /// Task counts keyed by `TaskStatus::as_str`.
    pub tasks_by_status: HashMap<String, i64>,
    /// Task counts keyed by `TaskPriority::as_str`.
    pub tasks_by_priority: HashMap<String, i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_for_canonical_columns() {
        assert_eq!(TaskStatus::for_column("todo"), Some(TaskStatus::Todo));
        assert_eq!(
            TaskStatus::for_column("inprogress"),
            Some(TaskStatus::InProgress)
        );
        assert_eq!(TaskStatus::for_column("done"), Some(TaskStatus::Done));
        assert_eq!(TaskStatus::for_column("custom-column"), None);
    }

    #[test]
    fn board_membership_includes_owner() {
        let board = Board {
            id: "b1".into(),
            name: "Test".into(),
            description: None,
            owner_id: "u1".into(),
            member_ids: vec!["u1".into(), "u2".into()],
            is_private: false,
            columns: vec![],
            settings: BoardSettings::default(),
            next_task_number: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(board.is_member("u1"));
        assert!(board.is_member("u2"));
        assert!(!board.is_member("u3"));
    }
}
