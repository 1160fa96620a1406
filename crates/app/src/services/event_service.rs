//! Event service — use-cases for appending and listing events.
//!
//! Every event is its own document under `<domain>/Events/<id>`. Appends
//! never touch an existing document, so concurrent appends to one domain
//! need no coordination beyond the store's exclusive create.

use seva_domain::error::{ConflictError, SevaError};
use seva_domain::event::Event;
use seva_domain::name::DomainName;

use crate::ports::{ChildKind, CreateOutcome, DocumentPath, DocumentStore};
use crate::services::domain_service::domain_path;
use crate::services::spec_service::SpecService;
use crate::services::storage_error;

const EVENTS: &str = "Events";

fn events_path(domain: &DomainName) -> DocumentPath {
    domain_path(domain).child(EVENTS)
}

/// Application service for the event store.
pub struct EventService<S> {
    specs: SpecService<S>,
    store: S,
}

impl<S: DocumentStore + Clone> EventService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self {
            specs: SpecService::new(store.clone()),
            store,
        }
    }
}

impl<S: DocumentStore> EventService<S> {
    /// Append a new event of `event_type` to `domain`.
    ///
    /// A spec for `event_type` must already be registered. The body is
    /// stored exactly as given; it is not checked against the spec.
    ///
    /// # Errors
    ///
    /// Returns [`SevaError::NotFound`] if the domain or the spec is absent,
    /// [`SevaError::Conflict`] if the freshly generated id is already taken,
    /// or a storage error from the store.
    pub async fn append(
        &self,
        domain: &str,
        event_type: &str,
        body: serde_json::Value,
    ) -> Result<Event, SevaError> {
        let (domain, event_type) = self.specs.require(domain, event_type).await?;

        let event = Event::new(event_type, body);
        let contents = serde_json::to_vec(&event).map_err(storage_error)?;
        let path = events_path(&domain).child(event.id.to_string());

        match self.store.create_document(&path, contents).await? {
            CreateOutcome::Created => {
                tracing::debug!(
                    domain = %domain,
                    event_type = %event.event_type,
                    event_id = %event.id,
                    "event appended"
                );
                Ok(event)
            }
            CreateOutcome::AlreadyExists => Err(ConflictError {
                entity: "Event",
                id: event.id.to_string(),
            }
            .into()),
        }
    }

    /// List every event of `domain`, oldest first.
    ///
    /// Events sharing a timestamp are ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`SevaError::NotFound`] if the domain does not exist, or a
    /// storage error if a stored event cannot be read.
    pub async fn list(&self, domain: &str) -> Result<Vec<Event>, SevaError> {
        let domain = self.specs.domains().require(domain).await?;
        let collection = events_path(&domain);
        let children = self
            .store
            .list_children(&collection)
            .await?
            .unwrap_or_default();

        let mut events = Vec::with_capacity(children.len());
        for child in children {
            if child.kind != ChildKind::Document {
                continue;
            }
            let Some(contents) = self.store.get(&collection.child(&child.name)).await? else {
                tracing::warn!(domain = %domain, event_id = %child.name, "event vanished while listing");
                continue;
            };
            let event: Event = serde_json::from_slice(&contents).map_err(storage_error)?;
            events.push(event);
        }

        events.sort_by(Event::chronological);
        Ok(events)
    }
}
