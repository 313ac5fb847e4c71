//! Typed errors returned to command handlers.
//!
//! The store never logs-and-swallows: every failed operation returns one of
//! these variants and leaves the store in its exact pre-call state. Handlers
//! translate them into user-facing chat messages.

use crate::types::EntityKind;
use serde::Serialize;
use thiserror::Error;

/// Failure taxonomy for store operations.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreError {
    /// A referenced entity id or name does not resolve.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// A reference matched more than one task where a single result is
    /// required and no tie-break applies.
    #[error("ambiguous reference {reference:?}: {count} tasks match")]
    AmbiguousMatch { reference: String, count: usize },

    /// A caller-supplied field violates a structural constraint.
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// A well-formed request that would violate a store invariant.
    #[error("invalid operation: {reason}")]
    InvalidOperation { reason: String },

    /// A loaded snapshot failed invariant re-validation. Names the first
    /// violated invariant.
    #[error("corrupt snapshot: {reason}")]
    CorruptSnapshot { reason: String },
}

impl StoreError {
    pub fn board_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: EntityKind::Board,
            id: id.into(),
        }
    }

    pub fn column_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: EntityKind::Column,
            id: id.into(),
        }
    }

    pub fn task_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: EntityKind::Task,
            id: id.into(),
        }
    }

    pub fn subtask_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: EntityKind::Subtask,
            id: id.into(),
        }
    }

    pub fn user_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: EntityKind::User,
            id: id.into(),
        }
    }

    pub fn ambiguous(reference: impl Into<String>, count: usize) -> Self {
        StoreError::AmbiguousMatch {
            reference: reference.into(),
            count,
        }
    }

    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        StoreError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_op(reason: impl Into<String>) -> Self {
        StoreError::InvalidOperation {
            reason: reason.into(),
        }
    }

    pub fn corrupt(reason: impl Into<String>) -> Self {
        StoreError::CorruptSnapshot {
            reason: reason.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
