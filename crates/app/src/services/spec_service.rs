//! Spec service — use-cases for the per-domain registry of event type specs.
//!
//! Specs live as documents under `<domain>/Specs/<event type>`. They are
//! append-only: there is no update or delete.

use std::collections::BTreeMap;

use seva_domain::error::{ConflictError, NotFoundError, SevaError};
use seva_domain::name::{DomainName, EventType};
use seva_domain::spec::Spec;

use crate::ports::{ChildKind, CreateOutcome, DocumentPath, DocumentStore};
use crate::services::domain_service::{DomainService, domain_path};
use crate::services::storage_error;

const SPECS: &str = "Specs";

fn specs_path(domain: &DomainName) -> DocumentPath {
    domain_path(domain).child(SPECS)
}

/// Application service for the spec registry.
pub struct SpecService<S> {
    domains: DomainService<S>,
    store: S,
}

impl<S: DocumentStore + Clone> SpecService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self {
            domains: DomainService::new(store.clone()),
            store,
        }
    }
}

impl<S: DocumentStore> SpecService<S> {
    /// The domain registry this service checks domains against.
    pub fn domains(&self) -> &DomainService<S> {
        &self.domains
    }

    fn spec_not_found(domain: &DomainName, event_type: &str) -> SevaError {
        NotFoundError {
            entity: "Spec",
            id: format!("{domain}/{event_type}"),
        }
        .into()
    }

    /// List the event types that have a spec in `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`SevaError::NotFound`] if the domain does not exist, or a
    /// storage error from the store.
    pub async fn list_event_types(&self, domain: &str) -> Result<Vec<EventType>, SevaError> {
        let domain = self.domains.require(domain).await?;
        self.event_types_of(&domain).await
    }

    /// Fetch the spec registered for `event_type` in `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`SevaError::NotFound`] if the domain or the spec is absent,
    /// or a storage error if the stored document cannot be read.
    pub async fn get(&self, domain: &str, event_type: &str) -> Result<Spec, SevaError> {
        let domain = self.domains.require(domain).await?;
        let Ok(parsed) = EventType::parse(event_type) else {
            return Err(Self::spec_not_found(&domain, event_type));
        };
        self.read(&domain, &parsed)
            .await?
            .ok_or_else(|| Self::spec_not_found(&domain, event_type))
    }

    /// Fetch every spec of `domain`, keyed by event type.
    ///
    /// If the listing yields the same event type twice, the first occurrence
    /// wins and later ones are dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SevaError::NotFound`] if the domain does not exist, or a
    /// storage error from the store.
    pub async fn get_all(&self, domain: &str) -> Result<BTreeMap<EventType, Spec>, SevaError> {
        let domain = self.domains.require(domain).await?;
        let event_types = self.event_types_of(&domain).await?;

        let mut specs = BTreeMap::new();
        for event_type in event_types {
            if specs.contains_key(&event_type) {
                tracing::warn!(
                    domain = %domain,
                    event_type = %event_type,
                    "duplicate spec for event type, keeping the first one"
                );
                continue;
            }
            let spec = self
                .read(&domain, &event_type)
                .await?
                .ok_or_else(|| Self::spec_not_found(&domain, event_type.as_str()))?;
            specs.insert(event_type, spec);
        }
        Ok(specs)
    }

    /// Register `spec` for `event_type` in `domain` and return it.
    ///
    /// # Errors
    ///
    /// Returns [`SevaError::NotFound`] if the domain does not exist,
    /// [`SevaError::Validation`] if `event_type` is not a valid identifier,
    /// [`SevaError::Conflict`] if a spec is already registered, or a storage
    /// error from the store.
    pub async fn create(
        &self,
        domain: &str,
        event_type: &str,
        spec: Spec,
    ) -> Result<Spec, SevaError> {
        let domain = self.domains.require(domain).await?;
        let event_type = EventType::parse(event_type)?;
        let contents = serde_json::to_vec(&spec).map_err(storage_error)?;

        let path = specs_path(&domain).child(event_type.as_str());
        match self.store.create_document(&path, contents).await? {
            CreateOutcome::Created => {
                tracing::info!(domain = %domain, event_type = %event_type, "spec created");
                Ok(spec)
            }
            CreateOutcome::AlreadyExists => Err(ConflictError {
                entity: "Spec",
                id: format!("{domain}/{event_type}"),
            }
            .into()),
        }
    }

    /// Resolve `domain` and `event_type`, requiring a registered spec.
    ///
    /// # Errors
    ///
    /// Returns [`SevaError::NotFound`] if the domain or the spec is absent,
    /// or a storage error from the store.
    pub async fn require(
        &self,
        domain: &str,
        event_type: &str,
    ) -> Result<(DomainName, EventType), SevaError> {
        let domain = self.domains.require(domain).await?;
        let Ok(parsed) = EventType::parse(event_type) else {
            return Err(Self::spec_not_found(&domain, event_type));
        };
        let path = specs_path(&domain).child(parsed.as_str());
        if self.store.get(&path).await?.is_some() {
            Ok((domain, parsed))
        } else {
            Err(Self::spec_not_found(&domain, event_type))
        }
    }

    async fn event_types_of(&self, domain: &DomainName) -> Result<Vec<EventType>, SevaError> {
        let children = self
            .store
            .list_children(&specs_path(domain))
            .await?
            .unwrap_or_default();

        Ok(children
            .into_iter()
            .filter(|child| child.kind == ChildKind::Document)
            .filter_map(|child| EventType::parse(child.name).ok())
            .collect())
    }

    async fn read(
        &self,
        domain: &DomainName,
        event_type: &EventType,
    ) -> Result<Option<Spec>, SevaError> {
        let path = specs_path(domain).child(event_type.as_str());
        let Some(contents) = self.store.get(&path).await? else {
            return Ok(None);
        };
        let spec = serde_json::from_slice(&contents).map_err(storage_error)?;
        Ok(Some(spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::InMemoryDocumentStore;
    use crate::ports::Child;
    use seva_domain::spec::{Field, Primitive};
    use std::future::Future;
    use std::sync::Arc;

    fn make_service() -> SpecService<Arc<InMemoryDocumentStore>> {
        SpecService::new(Arc::new(InMemoryDocumentStore::new()))
    }

    async fn with_domain(name: &str) -> SpecService<Arc<InMemoryDocumentStore>> {
        let svc = make_service();
        svc.domains.create(name).await.unwrap();
        svc
    }

    fn purchase() -> Spec {
        Spec::from([
            ("item".to_string(), Field::leaf(Primitive::String)),
            ("qty".to_string(), Field::leaf(Primitive::Number)),
        ])
    }

    #[tokio::test]
    async fn should_create_and_get_spec() {
        let svc = with_domain("shop").await;
        let created = svc.create("shop", "purchase", purchase()).await.unwrap();
        assert_eq!(created, purchase());

        let fetched = svc.get("shop", "purchase").await.unwrap();
        assert_eq!(fetched, purchase());
    }

    #[tokio::test]
    async fn should_roundtrip_nested_spec() {
        let svc = with_domain("shop").await;
        let spec = Spec::from([(
            "lines".to_string(),
            Field::array_of(Field::object_of([
                ("sku", Field::leaf(Primitive::String)),
                ("gift", Field::leaf(Primitive::Boolean)),
                ("note", Field::leaf(Primitive::Null)),
            ])),
        )]);
        svc.create("shop", "order", spec.clone()).await.unwrap();
        assert_eq!(svc.get("shop", "order").await.unwrap(), spec);
    }

    #[tokio::test]
    async fn should_return_not_found_when_domain_missing() {
        let svc = make_service();
        let result = svc.create("shop", "purchase", purchase()).await;
        assert!(matches!(result, Err(SevaError::NotFound(_))));

        let result = svc.list_event_types("shop").await;
        assert!(matches!(result, Err(SevaError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_return_conflict_when_spec_exists() {
        let svc = with_domain("shop").await;
        svc.create("shop", "purchase", purchase()).await.unwrap();
        let result = svc.create("shop", "purchase", Spec::new()).await;
        assert!(matches!(result, Err(SevaError::Conflict(_))));

        // the original spec is untouched
        assert_eq!(svc.get("shop", "purchase").await.unwrap(), purchase());
    }

    #[tokio::test]
    async fn should_reject_invalid_event_type_on_create() {
        let svc = with_domain("shop").await;
        let result = svc.create("shop", "Purchase", purchase()).await;
        assert!(matches!(result, Err(SevaError::Validation(_))));
    }

    #[tokio::test]
    async fn should_return_not_found_when_spec_missing() {
        let svc = with_domain("shop").await;
        let result = svc.get("shop", "refund").await;
        assert!(matches!(result, Err(SevaError::NotFound(_))));

        let result = svc.get("shop", "../../etc").await;
        assert!(matches!(result, Err(SevaError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_list_event_types_and_specs() {
        let svc = with_domain("shop").await;
        assert!(svc.list_event_types("shop").await.unwrap().is_empty());

        svc.create("shop", "purchase", purchase()).await.unwrap();
        svc.create("shop", "refund", Spec::new()).await.unwrap();

        let mut types = svc.list_event_types("shop").await.unwrap();
        types.sort();
        assert_eq!(
            types,
            [
                EventType::parse("purchase").unwrap(),
                EventType::parse("refund").unwrap()
            ]
        );

        let all = svc.get_all("shop").await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[&EventType::parse("purchase").unwrap()], purchase());
        assert!(all[&EventType::parse("refund").unwrap()].is_empty());
    }

    #[tokio::test]
    async fn should_scope_specs_to_their_domain() {
        let svc = with_domain("shop").await;
        svc.domains.create("blog").await.unwrap();
        svc.create("shop", "purchase", purchase()).await.unwrap();

        assert!(svc.get_all("blog").await.unwrap().is_empty());
        assert!(svc.require("blog", "purchase").await.is_err());
        assert!(svc.require("shop", "purchase").await.is_ok());
    }

    /// Store that lists the same spec document twice.
    #[derive(Clone, Default)]
    struct DuplicatingStore(Arc<InMemoryDocumentStore>);

    impl DocumentStore for DuplicatingStore {
        fn create_collection(
            &self,
            path: &DocumentPath,
        ) -> impl Future<Output = Result<CreateOutcome, SevaError>> + Send {
            self.0.create_collection(path)
        }

        fn create_document(
            &self,
            path: &DocumentPath,
            contents: Vec<u8>,
        ) -> impl Future<Output = Result<CreateOutcome, SevaError>> + Send {
            self.0.create_document(path, contents)
        }

        fn get(
            &self,
            path: &DocumentPath,
        ) -> impl Future<Output = Result<Option<Vec<u8>>, SevaError>> + Send {
            self.0.get(path)
        }

        async fn list_children(
            &self,
            path: &DocumentPath,
        ) -> Result<Option<Vec<Child>>, SevaError> {
            let children = self.0.list_children(path).await?;
            Ok(children.map(|mut children| {
                if path.name() == Some(SPECS) {
                    children.extend(children.clone());
                }
                children
            }))
        }
    }

    #[tokio::test]
    async fn should_keep_first_spec_when_listing_yields_duplicates() {
        let svc = SpecService::new(DuplicatingStore::default());
        svc.domains.create("shop").await.unwrap();
        svc.create("shop", "purchase", purchase()).await.unwrap();

        assert_eq!(svc.list_event_types("shop").await.unwrap().len(), 2);
        let all = svc.get_all("shop").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[&EventType::parse("purchase").unwrap()], purchase());
    }
}
