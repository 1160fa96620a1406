//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`SevaError`]
//! via `#[from]` (or a manual `From` impl for boxed storage failures).

use std::fmt;

/// Top-level error returned by every core operation.
#[derive(Debug, thiserror::Error)]
pub enum SevaError {
    /// A malformed identifier was supplied.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The entity being created already exists.
    #[error("{0}")]
    Conflict(#[from] ConflictError),

    /// A referenced domain or spec is absent.
    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// The underlying storage failed (permissions, disk, corrupt document).
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Identifier validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The identifier is the empty string.
    #[error("{kind} name must not be empty")]
    EmptyName { kind: NameKind },

    /// The identifier contains characters outside `[a-z0-9_]`.
    #[error("{kind} name {name:?} must only contain lowercase letters, digits and underscores")]
    InvalidName { kind: NameKind, name: String },
}

/// Which identifier a [`ValidationError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Domain,
    EventType,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain => f.write_str("domain"),
            Self::EventType => f.write_str("event type"),
        }
    }
}

/// A referenced entity does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// An entity with the same key already exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} already exists: {id}")]
pub struct ConflictError {
    pub entity: &'static str,
    pub id: String,
}
