//! In-process [`DocumentStore`] backed by a mutex-guarded ordered map.
//!
//! Nothing survives the process. Used by tests across the workspace and by
//! `sevad` when configured with the `memory` storage backend.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use seva_domain::error::SevaError;

use crate::ports::{Child, CreateOutcome, DocumentPath, DocumentStore};

#[derive(Debug, Clone)]
enum Node {
    Collection,
    Document(Vec<u8>),
}

/// Volatile document store.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    nodes: Mutex<BTreeMap<DocumentPath, Node>>,
}

/// Raised when a collection is requested below a missing parent, or a path
/// is already taken by a node of the other kind.
#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("parent collection of {0} does not exist")]
    MissingParent(DocumentPath),

    #[error("{0} is a document, not a collection")]
    NotACollection(DocumentPath),
}

impl From<MemoryStoreError> for SevaError {
    fn from(err: MemoryStoreError) -> Self {
        Self::Storage(Box::new(err))
    }
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<DocumentPath, Node>> {
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_collection(&self, path: &DocumentPath) -> Result<CreateOutcome, MemoryStoreError> {
        let mut nodes = self.lock();
        if path.is_root() || nodes.contains_key(path) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        let parent = path.parent().unwrap_or_default();
        if !is_collection(&nodes, &parent) {
            return Err(MemoryStoreError::MissingParent(path.clone()));
        }
        nodes.insert(path.clone(), Node::Collection);
        Ok(CreateOutcome::Created)
    }

    fn insert_document(
        &self,
        path: &DocumentPath,
        contents: Vec<u8>,
    ) -> Result<CreateOutcome, MemoryStoreError> {
        let mut nodes = self.lock();
        if path.is_root() || nodes.contains_key(path) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        if let Some(parent) = path.parent() {
            ensure_collections(&mut nodes, &parent)?;
        }
        nodes.insert(path.clone(), Node::Document(contents));
        Ok(CreateOutcome::Created)
    }
}

fn is_collection(nodes: &BTreeMap<DocumentPath, Node>, path: &DocumentPath) -> bool {
    path.is_root() || matches!(nodes.get(path), Some(Node::Collection))
}

fn ensure_collections(
    nodes: &mut BTreeMap<DocumentPath, Node>,
    path: &DocumentPath,
) -> Result<(), MemoryStoreError> {
    if path.is_root() {
        return Ok(());
    }
    match nodes.get(path) {
        Some(Node::Collection) => Ok(()),
        Some(Node::Document(_)) => Err(MemoryStoreError::NotACollection(path.clone())),
        None => {
            if let Some(parent) = path.parent() {
                ensure_collections(nodes, &parent)?;
            }
            nodes.insert(path.clone(), Node::Collection);
            Ok(())
        }
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn create_collection(
        &self,
        path: &DocumentPath,
    ) -> impl Future<Output = Result<CreateOutcome, SevaError>> + Send {
        let result = self.insert_collection(path).map_err(SevaError::from);
        async { result }
    }

    fn create_document(
        &self,
        path: &DocumentPath,
        contents: Vec<u8>,
    ) -> impl Future<Output = Result<CreateOutcome, SevaError>> + Send {
        let result = self
            .insert_document(path, contents)
            .map_err(SevaError::from);
        async { result }
    }

    fn get(
        &self,
        path: &DocumentPath,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, SevaError>> + Send {
        let result: Option<Vec<u8>> = match self.lock().get(path) {
            Some(Node::Document(contents)) => Some(contents.clone()),
            Some(Node::Collection) | None => None,
        };
        async { Ok(result) }
    }

    fn list_children(
        &self,
        path: &DocumentPath,
    ) -> impl Future<Output = Result<Option<Vec<Child>>, SevaError>> + Send {
        let nodes = self.lock();
        let result: Option<Vec<Child>> = is_collection(&nodes, path).then(|| {
            nodes
                .iter()
                .filter(|(key, _)| key.parent().as_ref() == Some(path))
                .filter_map(|(key, node)| {
                    let name = key.name()?;
                    Some(match node {
                        Node::Collection => Child::collection(name),
                        Node::Document(_) => Child::document(name),
                    })
                })
                .collect()
        });
        drop(nodes);
        async { Ok(result) }
    }
}
