//! # seva-domain
//!
//! Pure domain model for the seva event telemetry store.
//!
//! ## Responsibilities
//! - Foundational types: event identifiers, error conventions, timestamps
//! - Validate **names** used for domains and event types
//! - Define **Specs** (per event type schemas built from typed **Fields**)
//! - Define **Events** (immutable, timestamped records carrying a JSON body)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod name;
pub mod time;

pub mod event;
pub mod spec;
