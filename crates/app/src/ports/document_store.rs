//! Document store port — the persistence boundary of every service.
//!
//! Storage is a tree of named **collections** holding named **documents**
//! (opaque byte blobs). Records in seva are write-once, so the only write
//! primitives are exclusive creations: a create either publishes something
//! that did not exist before or reports [`CreateOutcome::AlreadyExists`].
//! Uniqueness of domains, specs and events rests on that atomicity rather
//! than on a separate existence check.

use std::fmt;
use std::future::Future;

use seva_domain::error::SevaError;

/// Location of a collection or document below the store root.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentPath(Vec<String>);

impl DocumentPath {
    /// The store root; always exists.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of the child `name` below `self`.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    /// Path segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Last segment, `None` for the root.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Enclosing collection, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.0.split_last()?;
        Some(Self(init.to_vec()))
    }

    /// `true` for the store root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0.join("/"))
    }
}

/// Result of an exclusive create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// What a [`Child`] entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    Collection,
    Document,
}

/// One entry of a collection listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    pub name: String,
    pub kind: ChildKind,
}

impl Child {
    #[must_use]
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ChildKind::Collection,
        }
    }

    #[must_use]
    pub fn document(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ChildKind::Document,
        }
    }
}

/// Hierarchical document storage with atomic create-if-absent.
///
/// Implementations report infrastructure failures as
/// [`SevaError::Storage`]; "already there" and "not there" are ordinary
/// return values, never errors.
pub trait DocumentStore {
    /// Create an empty collection at `path`. The parent must exist.
    fn create_collection(
        &self,
        path: &DocumentPath,
    ) -> impl Future<Output = Result<CreateOutcome, SevaError>> + Send;

    /// Publish `contents` at `path` unless something is already there.
    ///
    /// Missing parent collections are created. Readers never observe a
    /// partially written document.
    fn create_document(
        &self,
        path: &DocumentPath,
        contents: Vec<u8>,
    ) -> impl Future<Output = Result<CreateOutcome, SevaError>> + Send;

    /// Read the document at `path`, `None` if there is none.
    fn get(
        &self,
        path: &DocumentPath,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, SevaError>> + Send;

    /// List the entries of the collection at `path`, `None` if there is no
    /// such collection. Order is unspecified.
    fn list_children(
        &self,
        path: &DocumentPath,
    ) -> impl Future<Output = Result<Option<Vec<Child>>, SevaError>> + Send;
}

impl<T: DocumentStore + Send + Sync> DocumentStore for std::sync::Arc<T> {
    fn create_collection(
        &self,
        path: &DocumentPath,
    ) -> impl Future<Output = Result<CreateOutcome, SevaError>> + Send {
        (**self).create_collection(path)
    }

    fn create_document(
        &self,
        path: &DocumentPath,
        contents: Vec<u8>,
    ) -> impl Future<Output = Result<CreateOutcome, SevaError>> + Send {
        (**self).create_document(path, contents)
    }

    fn get(
        &self,
        path: &DocumentPath,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, SevaError>> + Send {
        (**self).get(path)
    }

    fn list_children(
        &self,
        path: &DocumentPath,
    ) -> impl Future<Output = Result<Option<Vec<Child>>, SevaError>> + Send {
        (**self).list_children(path)
    }
}
