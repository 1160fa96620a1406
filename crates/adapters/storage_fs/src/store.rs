//! Filesystem implementation of [`DocumentStore`].
//!
//! ```text
//! <data_dir>/
//!   shop/                      collection
//!     Specs/
//!       purchase.json          document
//!     Events/
//!       3f2b...e1.json
//! ```

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use seva_app::ports::{Child, CreateOutcome, DocumentPath, DocumentStore};
use seva_domain::error::SevaError;

use crate::error::StorageError;

const DOCUMENT_EXTENSION: &str = ".json";

/// Configuration for the filesystem storage adapter.
pub struct Config {
    /// Directory holding every domain.
    pub data_dir: PathBuf,
}

impl Config {
    /// Build a [`FsDocumentStore`] from this configuration, creating the
    /// data directory if missing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the data directory cannot be created.
    pub async fn build(self) -> Result<FsDocumentStore, StorageError> {
        FsDocumentStore::open(self.data_dir).await
    }
}

/// Document store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn check_segment(segment: &str) -> Result<&str, StorageError> {
    let forbidden = segment.is_empty()
        || segment.starts_with('.')
        || segment.contains(['/', '\\', '\0']);
    if forbidden {
        Err(StorageError::InvalidSegment(segment.to_string()))
    } else {
        Ok(segment)
    }
}

impl FsDocumentStore {
    /// Open (and create if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if `root` cannot be created.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(io_error(&root))?;
        tracing::debug!(root = %root.display(), "filesystem store opened");
        Ok(Self { root })
    }

    /// Directory holding every collection.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, path: &DocumentPath) -> Result<PathBuf, StorageError> {
        let mut dir = self.root.clone();
        for segment in path.segments() {
            dir.push(check_segment(segment)?);
        }
        Ok(dir)
    }

    fn document_file(&self, path: &DocumentPath) -> Result<PathBuf, StorageError> {
        let (Some(name), Some(parent)) = (path.name(), path.parent()) else {
            return Err(StorageError::InvalidSegment(String::new()));
        };
        let name = check_segment(name)?;
        Ok(self
            .collection_dir(&parent)?
            .join(format!("{name}{DOCUMENT_EXTENSION}")))
    }

    async fn write_temp(dir: &Path, name: &str, contents: &[u8]) -> Result<PathBuf, StorageError> {
        let temp = dir.join(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()));
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp)
            .await
            .map_err(io_error(&temp))?;
        file.write_all(contents).await.map_err(io_error(&temp))?;
        file.sync_all().await.map_err(io_error(&temp))?;
        Ok(temp)
    }

    async fn publish(&self, path: &DocumentPath, contents: &[u8]) -> Result<CreateOutcome, StorageError> {
        let target = self.document_file(path)?;
        let Some(dir) = target.parent() else {
            return Err(StorageError::InvalidSegment(String::new()));
        };
        fs::create_dir_all(dir).await.map_err(io_error(dir))?;

        // `hard_link` refuses to replace an existing name, which makes the
        // fully written temp file visible under its final name exactly once.
        let name = path.name().unwrap_or_default();
        let temp = Self::write_temp(dir, name, contents).await?;
        let linked = fs::hard_link(&temp, &target).await;
        if let Err(err) = fs::remove_file(&temp).await {
            tracing::warn!(temp = %temp.display(), error = %err, "failed to remove temp file");
        }

        match linked {
            Ok(()) => Ok(CreateOutcome::Created),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(err) => Err(io_error(&target)(err)),
        }
    }

    async fn read_dir(&self, path: &DocumentPath) -> Result<Option<Vec<Child>>, StorageError> {
        let dir = self.collection_dir(path)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(io_error(&dir)(err)),
        };

        let mut children = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error(&dir))? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let file_type = entry.file_type().await.map_err(io_error(&entry.path()))?;
            if file_type.is_dir() {
                children.push(Child::collection(name));
            } else if let Some(stem) = name.strip_suffix(DOCUMENT_EXTENSION)
                && file_type.is_file()
            {
                children.push(Child::document(stem));
            }
        }
        Ok(Some(children))
    }
}

impl DocumentStore for FsDocumentStore {
    async fn create_collection(&self, path: &DocumentPath) -> Result<CreateOutcome, SevaError> {
        if path.is_root() {
            return Ok(CreateOutcome::AlreadyExists);
        }
        let dir = self.collection_dir(path)?;
        match fs::create_dir(&dir).await {
            Ok(()) => Ok(CreateOutcome::Created),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(err) => Err(io_error(&dir)(err).into()),
        }
    }

    async fn create_document(
        &self,
        path: &DocumentPath,
        contents: Vec<u8>,
    ) -> Result<CreateOutcome, SevaError> {
        self.publish(path, &contents).await.map_err(SevaError::from)
    }

    async fn get(&self, path: &DocumentPath) -> Result<Option<Vec<u8>>, SevaError> {
        let file = self.document_file(path)?;
        match fs::read(&file).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(&file)(err).into()),
        }
    }

    async fn list_children(&self, path: &DocumentPath) -> Result<Option<Vec<Child>>, SevaError> {
        self.read_dir(path).await.map_err(SevaError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    async fn setup() -> (FsDocumentStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Config {
            data_dir: dir.path().join("Domains"),
        }
        .build()
        .await
        .unwrap();
        (store, dir)
    }

    fn path(segments: &[&str]) -> DocumentPath {
        segments
            .iter()
            .fold(DocumentPath::root(), |path, segment| path.child(*segment))
    }

    #[tokio::test]
    async fn should_create_data_dir_when_opening() {
        let (store, _dir) = setup().await;
        assert!(store.root().is_dir());
    }

    #[tokio::test]
    async fn should_create_collection_as_directory_once() {
        let (store, _dir) = setup().await;
        let shop = path(&["shop"]);

        assert_eq!(
            store.create_collection(&shop).await.unwrap(),
            CreateOutcome::Created
        );
        assert!(store.root().join("shop").is_dir());
        assert_eq!(
            store.create_collection(&shop).await.unwrap(),
            CreateOutcome::AlreadyExists
        );
    }

    #[tokio::test]
    async fn should_write_document_as_json_file_with_missing_parents() {
        let (store, _dir) = setup().await;
        store.create_collection(&path(&["shop"])).await.unwrap();
        let doc = path(&["shop", "Specs", "purchase"]);

        let outcome = store
            .create_document(&doc, br#"{"item":{"Type":"String"}}"#.to_vec())
            .await
            .unwrap();
        assert_eq!(outcome, CreateOutcome::Created);

        let on_disk = store.root().join("shop").join("Specs").join("purchase.json");
        assert!(on_disk.is_file());
        let contents = store.get(&doc).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&contents).unwrap();
        assert_eq!(value["item"]["Type"], "String");
    }

    #[tokio::test]
    async fn should_not_overwrite_existing_document() {
        let (store, _dir) = setup().await;
        let doc = path(&["shop", "Events", "abc"]);
        store.create_document(&doc, b"first".to_vec()).await.unwrap();

        let outcome = store.create_document(&doc, b"second".to_vec()).await.unwrap();
        assert_eq!(outcome, CreateOutcome::AlreadyExists);
        assert_eq!(store.get(&doc).await.unwrap().unwrap(), b"first");
    }

    #[tokio::test]
    async fn should_leave_no_temp_files_behind() {
        let (store, _dir) = setup().await;
        let doc = path(&["shop", "Events", "abc"]);
        store.create_document(&doc, b"1".to_vec()).await.unwrap();
        store.create_document(&doc, b"2".to_vec()).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(store.root().join("shop").join("Events"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["abc.json"]);
    }

    #[tokio::test]
    async fn should_return_none_for_missing_document_and_collection() {
        let (store, _dir) = setup().await;
        assert!(store.get(&path(&["shop", "Specs", "x"])).await.unwrap().is_none());
        assert!(store.list_children(&path(&["shop"])).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_list_collections_and_json_documents_only() {
        let (store, _dir) = setup().await;
        store.create_collection(&path(&["shop"])).await.unwrap();
        store
            .create_document(&path(&["shop", "Events", "one"]), b"{}".to_vec())
            .await
            .unwrap();
        std::fs::write(store.root().join("shop").join("notes.txt"), "ignored").unwrap();
        std::fs::write(store.root().join("shop").join(".hidden.json"), "{}").unwrap();
        std::fs::write(store.root().join("shop").join("loose.json"), "{}").unwrap();

        let mut children = store
            .list_children(&path(&["shop"]))
            .await
            .unwrap()
            .unwrap();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            children,
            vec![Child::collection("Events"), Child::document("loose")]
        );
    }

    #[tokio::test]
    async fn should_reject_segments_that_escape_the_root() {
        let (store, _dir) = setup().await;
        for bad in ["..", ".", "", "a/b", ".tmp"] {
            let result = store.create_collection(&path(&[bad])).await;
            assert!(matches!(result, Err(SevaError::Storage(_))), "{bad:?}");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn should_publish_exactly_once_under_contention() {
        let (store, _dir) = setup().await;
        let store = Arc::new(store);
        let doc = path(&["shop", "Specs", "purchase"]);

        let handles: Vec<_> = (0..16u8)
            .map(|n| {
                let store = Arc::clone(&store);
                let doc = doc.clone();
                tokio::spawn(async move { store.create_document(&doc, vec![n]).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() == CreateOutcome::Created {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.get(&doc).await.unwrap().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_list_many_distinct_documents() {
        let (store, _dir) = setup().await;
        for n in 0..10 {
            store
                .create_document(&path(&["shop", "Events", &format!("e{n}")]), Vec::new())
                .await
                .unwrap();
        }
        let names: HashSet<String> = store
            .list_children(&path(&["shop", "Events"]))
            .await
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|child| child.name)
            .collect();
        assert_eq!(names.len(), 10);
    }
}
