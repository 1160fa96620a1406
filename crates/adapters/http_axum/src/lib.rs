//! # seva-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a small **JSON RPC** surface (`POST /Rpc/<Area>/<Operation>`)
//!   over the domain, spec and event services
//! - Wrap every response in the `{ "Code": ..., "Body": ... }` envelope
//! - Map [`SevaError`](seva_domain::error::SevaError) variants to HTTP
//!   status codes and envelope codes
//!
//! ## Dependency rule
//! Depends on `seva-app` (for port traits and services) and `seva-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod rpc;
pub mod state;
