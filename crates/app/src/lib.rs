//! # seva-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** that storage adapters must implement
//!   (driven/outbound port):
//!   - `DocumentStore` — exclusive creation, lookup and listing of documents
//!     and collections
//! - Define **driving/inbound ports** as use-case structs:
//!   - `DomainService` — list, check, create domains
//!   - `SpecService` — list, get, create per-domain event type specs
//!   - `EventService` — append and list events of a domain
//! - Provide **in-process infrastructure** that doesn't need IO
//!   (`InMemoryDocumentStore`)
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `seva-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod memory_store;
pub mod ports;
pub mod services;
