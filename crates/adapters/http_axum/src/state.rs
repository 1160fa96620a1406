//! Shared application state for axum handlers.

use std::sync::Arc;

use seva_app::ports::DocumentStore;
use seva_app::services::domain_service::DomainService;
use seva_app::services::event_service::EventService;
use seva_app::services::spec_service::SpecService;

/// Application state shared across all axum handlers.
///
/// Generic over the document store to avoid dynamic dispatch.
/// `Clone` is implemented manually so the store itself does not need to be
/// `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<S> {
    /// Domain registry.
    pub domain_service: Arc<DomainService<S>>,
    /// Spec registry.
    pub spec_service: Arc<SpecService<S>>,
    /// Event store.
    pub event_service: Arc<EventService<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            domain_service: Arc::clone(&self.domain_service),
            spec_service: Arc::clone(&self.spec_service),
            event_service: Arc::clone(&self.event_service),
        }
    }
}

impl<S> AppState<S>
where
    S: DocumentStore + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        domain_service: DomainService<S>,
        spec_service: SpecService<S>,
        event_service: EventService<S>,
    ) -> Self {
        Self {
            domain_service: Arc::new(domain_service),
            spec_service: Arc::new(spec_service),
            event_service: Arc::new(event_service),
        }
    }

    /// Wire all three services onto one shared store.
    pub fn from_store(store: S) -> Self
    where
        S: Clone,
    {
        Self::new(
            DomainService::new(store.clone()),
            SpecService::new(store.clone()),
            EventService::new(store),
        )
    }
}
