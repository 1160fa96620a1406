//! Event — an immutable, timestamped record of something that happened in a
//! domain.
//!
//! The body is kept exactly as submitted: it is never checked against the
//! [`Spec`](crate::spec::Spec) registered for the event type.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::id::EventId;
use crate::name::EventType;
use crate::time::{self, Timestamp};

/// A persisted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Event {
    pub id: EventId,
    #[serde(rename = "Type")]
    pub event_type: EventType,
    pub time: Timestamp,
    pub body: serde_json::Value,
}

impl Event {
    /// Create an event with a fresh id, stamped with the current time.
    #[must_use]
    pub fn new(event_type: EventType, body: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            time: time::now(),
            body,
        }
    }

    /// Chronological order, ties broken by id.
    #[must_use]
    pub fn chronological(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.id.cmp(&other.id))
    }
}
