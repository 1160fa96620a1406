//! # seva-adapter-storage-fs
//!
//! Filesystem persistence adapter built on [`tokio::fs`].
//!
//! ## Responsibilities
//! - Implement the `DocumentStore` port defined in `seva-app::ports`
//! - Map collections to directories and documents to `<name>.json` files
//!   below a configurable data directory
//! - Publish documents atomically and exclusively (temp file + hard link)
//!
//! ## Dependency rule
//! Depends on `seva-app` (for the port trait) and `seva-domain` (for the
//! error type). The `app` and `domain` crates must never reference this adapter.

mod error;
mod store;

pub use error::StorageError;
pub use store::{Config, FsDocumentStore};
