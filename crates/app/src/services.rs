//! Application services — use-case implementations.
//!
//! Each service struct accepts a port trait implementation via a generic
//! parameter (constructor injection), keeping this layer decoupled from
//! concrete adapters. Services keep no state of their own: every call
//! re-reads the store.

pub mod domain_service;
pub mod event_service;
pub mod spec_service;

use seva_domain::error::SevaError;

/// Wrap a (de)serialization failure of a stored document.
pub(crate) fn storage_error(err: serde_json::Error) -> SevaError {
    SevaError::Storage(Box::new(err))
}
