//! Domain service — use-cases for managing domains.
//!
//! A domain is a top-level collection of the document store, keyed by its
//! validated name.

use seva_domain::error::{ConflictError, NotFoundError, SevaError};
use seva_domain::name::{self, DomainName};

use crate::ports::{ChildKind, CreateOutcome, DocumentPath, DocumentStore};

/// Storage location of `domain`.
pub(crate) fn domain_path(domain: &DomainName) -> DocumentPath {
    DocumentPath::root().child(domain.as_str())
}

/// Application service for the domain registry.
pub struct DomainService<S> {
    store: S,
}

impl<S: DocumentStore> DomainService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// List every registered domain. Order is storage-dependent.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn list(&self) -> Result<Vec<DomainName>, SevaError> {
        let children = self
            .store
            .list_children(&DocumentPath::root())
            .await?
            .unwrap_or_default();

        Ok(children
            .into_iter()
            .filter(|child| child.kind == ChildKind::Collection)
            .filter_map(|child| DomainName::parse(child.name).ok())
            .collect())
    }

    /// Whether `name` is a registered domain.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn exists(&self, name: &str) -> Result<bool, SevaError> {
        if !name::is_valid(name) {
            return Ok(false);
        }
        let domains = self.list().await?;
        Ok(domains.iter().any(|domain| domain.as_str() == name))
    }

    /// Register a new domain.
    ///
    /// Creation is a single exclusive create in the store, so two concurrent
    /// callers racing on the same name see exactly one success.
    ///
    /// # Errors
    ///
    /// Returns [`SevaError::Validation`] if `name` is not a valid identifier,
    /// [`SevaError::Conflict`] if the domain already exists, or a storage
    /// error from the store.
    pub async fn create(&self, name: &str) -> Result<DomainName, SevaError> {
        let domain = DomainName::parse(name)?;
        match self.store.create_collection(&domain_path(&domain)).await? {
            CreateOutcome::Created => {
                tracing::info!(domain = %domain, "domain created");
                Ok(domain)
            }
            CreateOutcome::AlreadyExists => Err(ConflictError {
                entity: "Domain",
                id: domain.to_string(),
            }
            .into()),
        }
    }

    /// Resolve `name` to a registered domain.
    ///
    /// # Errors
    ///
    /// Returns [`SevaError::NotFound`] when `name` is not registered (invalid
    /// names never are), or a storage error from the store.
    pub async fn require(&self, name: &str) -> Result<DomainName, SevaError> {
        let not_found = || NotFoundError {
            entity: "Domain",
            id: name.to_string(),
        };
        let Ok(domain) = DomainName::parse(name) else {
            return Err(not_found().into());
        };
        if self.exists(domain.as_str()).await? {
            Ok(domain)
        } else {
            Err(not_found().into())
        }
    }
}
