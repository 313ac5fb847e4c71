//! Subtask operations. The parent task's ordered `subtask_ids` and the
//! subtask's `parent_task_id` back-pointer are kept in sync here.

use super::{Store, new_id, now};
use crate::error::{StoreError, StoreResult};
use crate::types::{CreateSubtaskRequest, Subtask};
use tracing::debug;

impl Store {
    /// Create a subtask and append it to the parent's checklist order.
    pub fn create_subtask(&self, req: CreateSubtaskRequest) -> StoreResult<Subtask> {
        self.with_inner_mut(|inner| {
            inner.validate_name("title", &req.title)?;
            let parent = inner
                .tasks
                .get_mut(&req.parent_task_id)
                .ok_or_else(|| StoreError::task_not_found(&req.parent_task_id))?;

            let ts = now();
            let subtask = Subtask {
                id: new_id(),
                parent_task_id: req.parent_task_id.clone(),
                title: req.title,
                completed: false,
                created_at: ts,
                updated_at: ts,
            };
            parent.subtask_ids.push(subtask.id.clone());
            parent.updated_at = ts;

            inner.subtasks.insert(subtask.id.clone(), subtask.clone());
            debug!(subtask_id = %subtask.id, parent = %subtask.parent_task_id, "subtask created");
            Ok(subtask)
        })
    }

    /// Rename a subtask.
    pub fn update_subtask(&self, subtask_id: &str, title: &str) -> StoreResult<Subtask> {
        self.with_inner_mut(|inner| {
            inner.validate_name("title", title)?;
            let subtask = inner
                .subtasks
                .get_mut(subtask_id)
                .ok_or_else(|| StoreError::subtask_not_found(subtask_id))?;
            subtask.title = title.to_string();
            subtask.updated_at = now();
            Ok(subtask.clone())
        })
    }

    /// Flip a subtask's completed flag.
    pub fn toggle_subtask(&self, subtask_id: &str) -> StoreResult<Subtask> {
        self.with_inner_mut(|inner| {
            let subtask = inner
                .subtasks
                .get_mut(subtask_id)
                .ok_or_else(|| StoreError::subtask_not_found(subtask_id))?;
            subtask.completed = !subtask.completed;
            subtask.updated_at = now();
            Ok(subtask.clone())
        })
    }

    /// Delete a subtask and unlink it from its parent's checklist.
    pub fn delete_subtask(&self, subtask_id: &str) -> StoreResult<()> {
        self.with_inner_mut(|inner| {
            let subtask = inner
                .subtasks
                .get(subtask_id)
                .ok_or_else(|| StoreError::subtask_not_found(subtask_id))?;
            let parent_id = subtask.parent_task_id.clone();

            if let Some(parent) = inner.tasks.get_mut(&parent_id) {
                parent.subtask_ids.retain(|id| id != subtask_id);
                parent.updated_at = now();
            }
            inner.subtasks.remove(subtask_id);

            debug!(subtask_id, "subtask deleted");
            Ok(())
        })
    }
}
