//! The relational store.
//!
//! One `Store` instance owns every entity collection for one bot process.
//! Mutations funnel through a single in-process lock, so each operation is a
//! critical section: callers never observe column membership and task
//! pointers out of sync. Operations validate first and mutate second, which
//! keeps a failed call side-effect-free.

pub mod boards;
pub mod subtasks;
pub mod tasks;
pub mod users;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::types::{Board, Subtask, Task, User};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Entity collections, keyed by id. Columns ride embedded in their board;
/// their `task_ids` are ordered lists of keys into `tasks`.
#[derive(Debug, Default)]
pub(crate) struct StoreInner {
    pub(crate) config: StoreConfig,
    pub(crate) boards: HashMap<String, Board>,
    pub(crate) tasks: HashMap<String, Task>,
    pub(crate) subtasks: HashMap<String, Subtask>,
    pub(crate) users: HashMap<String, User>,
}

impl StoreInner {
    pub(crate) fn board(&self, board_id: &str) -> StoreResult<&Board> {
        self.boards
            .get(board_id)
            .ok_or_else(|| StoreError::board_not_found(board_id))
    }

    pub(crate) fn board_mut(&mut self, board_id: &str) -> StoreResult<&mut Board> {
        self.boards
            .get_mut(board_id)
            .ok_or_else(|| StoreError::board_not_found(board_id))
    }

    pub(crate) fn task(&self, task_id: &str) -> StoreResult<&Task> {
        self.tasks
            .get(task_id)
            .ok_or_else(|| StoreError::task_not_found(task_id))
    }

    /// Reject names the store considers structurally invalid: empty after
    /// trimming, or longer than the configured bound.
    pub(crate) fn validate_name(&self, field: &str, value: &str) -> StoreResult<()> {
        if value.trim().is_empty() {
            return Err(StoreError::validation(field, "must not be empty"));
        }
        if value.chars().count() > self.config.max_name_len {
            return Err(StoreError::validation(
                field,
                format!("must be at most {} characters", self.config.max_name_len),
            ));
        }
        Ok(())
    }
}

/// Handle to a store instance. Cheap to clone; all clones share state.
///
/// Constructed once by the process entry point and passed to every command
/// handler. Never a process-wide singleton, so tests can run isolated stores
/// side by side.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Mutex<StoreInner>>,
}

impl Store {
    /// Create an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store with an explicit configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                config,
                ..StoreInner::default()
            })),
        }
    }

    /// Run a read against the collections under the lock.
    pub(crate) fn with_inner<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&StoreInner) -> T,
    {
        let inner = self.inner.lock().unwrap();
        f(&inner)
    }

    /// Run a mutation against the collections under the lock.
    pub(crate) fn with_inner_mut<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut StoreInner) -> T,
    {
        let mut inner = self.inner.lock().unwrap();
        f(&mut inner)
    }

    /// Drop every entity. Used by the snapshot restore path and by hosts
    /// that recycle a store between test scenarios.
    pub fn clear(&self) {
        self.with_inner_mut(|inner| {
            inner.boards.clear();
            inner.tasks.clear();
            inner.subtasks.clear();
            inner.users.clear();
        });
        tracing::debug!("store cleared");
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Allocate a fresh entity id (UUID v7, time-ordered).
pub(crate) fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// Current wall-clock time for `created_at`/`updated_at` stamps.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

/// True if `s` is in the store's generated id format.
pub(crate) fn is_id_format(s: &str) -> bool {
    Uuid::parse_str(s).is_ok()
}
