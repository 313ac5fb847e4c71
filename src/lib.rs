//! In-memory relational core for a chat-bot Kanban board manager.
//!
//! Boards own ordered columns, columns order tasks, tasks own subtasks, and
//! users are referenced by membership and assignment. The [`store::Store`]
//! enforces the cross-reference invariants under every mutation, the resolver
//! turns legacy free-text references into concrete tasks, and the snapshot
//! codec hands a validated, versioned copy of the whole state to an external
//! persistence collaborator.
//!
//! Chat-platform command parsing, message rendering, and storage media are
//! external: this crate consumes plain request structs and returns plain
//! entities and typed errors.

pub mod config;
pub mod error;
pub mod logging;
pub mod query;
pub mod resolve;
pub mod snapshot;
pub mod store;
pub mod types;
