//! Vector store persisted as JSON files on local storage.
//!
//! Each collection lives in `<root>/<name>.json`. Collections are loaded
//! lazily on first access and rewritten after every mutation (temp file
//! followed by a rename, so a crash never leaves a half-written index).
//!
//! Only one process may write to a given collection at a time. Readers in
//! other processes see the state as of their first load.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::document::{EmbeddingRecord, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::{VectorStore, rank};

const BACKEND: &str = "file";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCollection {
    dimensions: usize,
    records: BTreeMap<String, EmbeddingRecord>,
}

/// A [`VectorStore`] that keeps each collection in a JSON file under a root directory.
///
/// # Example
///
/// ```rust,ignore
/// use clinrag::{FileVectorStore, VectorStore};
///
/// let store = FileVectorStore::new("data/vector_store");
/// store.create_collection("clinical_guidelines", 1536).await?;
/// ```
#[derive(Debug)]
pub struct FileVectorStore {
    root: PathBuf,
    collections: RwLock<HashMap<String, StoredCollection>>,
}

impl FileVectorStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), collections: RwLock::new(HashMap::new()) }
    }

    /// The directory holding the collection files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn map_err(e: impl std::fmt::Display) -> RagError {
        RagError::VectorStoreError { backend: BACKEND.to_string(), message: e.to_string() }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !name.starts_with('.');
        if !valid {
            return Err(Self::map_err(format!("invalid collection name '{name}'")));
        }
        Ok(self.root.join(format!("{name}.json")))
    }

    /// Make sure `name` is in the cache, reading it from disk if needed.
    async fn ensure_loaded(&self, name: &str) -> Result<()> {
        if self.collections.read().await.contains_key(name) {
            return Ok(());
        }

        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            return Ok(());
        }

        let path = self.path_for(name)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RagError::NotFoundError(format!("collection '{name}'")));
            }
            Err(e) => return Err(Self::map_err(format!("failed to read {}: {e}", path.display()))),
        };
        let stored: StoredCollection = serde_json::from_slice(&bytes)
            .map_err(|e| Self::map_err(format!("corrupt collection file {}: {e}", path.display())))?;

        debug!(collection = name, records = stored.records.len(), "loaded collection from disk");
        collections.insert(name.to_string(), stored);
        Ok(())
    }

    async fn persist(&self, name: &str, stored: &StoredCollection) -> Result<()> {
        let path = self.path_for(name)?;
        tokio::fs::create_dir_all(&self.root).await.map_err(Self::map_err)?;

        let bytes = serde_json::to_vec(stored).map_err(Self::map_err)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await.map_err(Self::map_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(Self::map_err)?;
        Ok(())
    }
}

fn missing(collection: &str) -> RagError {
    RagError::NotFoundError(format!("collection '{collection}'"))
}

#[async_trait]
impl VectorStore for FileVectorStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        match self.ensure_loaded(name).await {
            Ok(()) => return Ok(()),
            Err(RagError::NotFoundError(_)) => {}
            Err(e) => return Err(e),
        }

        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            return Ok(());
        }
        let stored = StoredCollection { dimensions, records: BTreeMap::new() };
        self.persist(name, &stored).await?;
        collections.insert(name.to_string(), stored);
        debug!(collection = name, dimensions, "created collection");
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        let mut collections = self.collections.write().await;
        collections.remove(name);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(collection = name, "deleted collection"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Self::map_err(e)),
        }
        Ok(())
    }

    async fn upsert(&self, collection: &str, records: &[EmbeddingRecord]) -> Result<()> {
        self.ensure_loaded(collection).await?;

        let mut collections = self.collections.write().await;
        let stored = collections.get_mut(collection).ok_or_else(|| missing(collection))?;

        // The cache only changes once the new state is on disk.
        let mut updated =
            StoredCollection { dimensions: stored.dimensions, records: stored.records.clone() };
        for record in records {
            updated.records.insert(record.id().to_string(), record.clone());
        }
        self.persist(collection, &updated).await?;
        *stored = updated;
        Ok(())
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        self.ensure_loaded(collection).await?;
        let collections = self.collections.read().await;
        collections.get(collection).map(|c| c.records.len()).ok_or_else(|| missing(collection))
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        self.ensure_loaded(collection).await?;
        let collections = self.collections.read().await;
        let stored = collections.get(collection).ok_or_else(|| missing(collection))?;
        Ok(rank(stored.records.values(), embedding, top_k))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::document::Passage;

    fn record(id: &str, embedding: Vec<f32>) -> EmbeddingRecord {
        EmbeddingRecord {
            passage: Passage { id: id.into(), text: format!("text of {id}"), metadata: HashMap::new() },
            embedding,
        }
    }

    #[tokio::test]
    async fn records_survive_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileVectorStore::new(dir.path());
            store.create_collection("guidelines", 2).await.unwrap();
            store
                .upsert("guidelines", &[record("a", vec![1.0, 0.0]), record("b", vec![0.0, 1.0])])
                .await
                .unwrap();
        }

        let reopened = FileVectorStore::new(dir.path());
        assert_eq!(reopened.count("guidelines").await.unwrap(), 2);
        let results = reopened.search("guidelines", &[0.9, 0.1], 1).await.unwrap();
        assert_eq!(results[0].passage.id, "a");
    }

    #[tokio::test]
    async fn missing_collection_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileVectorStore::new(dir.path());
        let err = store.search("nope", &[1.0], 3).await.unwrap_err();
        assert!(matches!(err, RagError::NotFoundError(_)));
    }

    #[tokio::test]
    async fn delete_is_a_noop_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileVectorStore::new(dir.path().join("never_created"));
        store.delete_collection("ghost").await.unwrap();
    }

    #[tokio::test]
    async fn delete_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileVectorStore::new(dir.path());
        store.create_collection("tmp", 2).await.unwrap();
        assert!(dir.path().join("tmp.json").exists());

        store.delete_collection("tmp").await.unwrap();
        assert!(!dir.path().join("tmp.json").exists());
        assert!(matches!(store.count("tmp").await, Err(RagError::NotFoundError(_))));
    }

    #[tokio::test]
    async fn failed_write_leaves_the_collection_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileVectorStore::new(dir.path());
        store.create_collection("guides", 2).await.unwrap();
        store.upsert("guides", &[record("g_0", vec![1.0, 0.0])]).await.unwrap();

        // A directory where the temp file should go makes the write fail.
        let blocker = dir.path().join("guides.json.tmp");
        std::fs::create_dir(&blocker).unwrap();
        let err = store
            .upsert("guides", &[record("g_1", vec![0.0, 1.0]), record("g_2", vec![1.0, 1.0])])
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::VectorStoreError { .. }));
        assert_eq!(store.count("guides").await.unwrap(), 1);

        std::fs::remove_dir(&blocker).unwrap();
        store.upsert("guides", &[record("g_3", vec![0.5, 0.5])]).await.unwrap();
        assert_eq!(store.count("guides").await.unwrap(), 2);

        let reopened = FileVectorStore::new(dir.path());
        let ids: Vec<String> = reopened
            .search("guides", &[1.0, 0.0], 10)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.passage.id)
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(!ids.iter().any(|id| id == "g_1" || id == "g_2"));
    }

    #[tokio::test]
    async fn failed_create_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileVectorStore::new(dir.path());
        std::fs::create_dir(dir.path().join("guides.json.tmp")).unwrap();

        assert!(store.create_collection("guides", 2).await.is_err());
        assert!(matches!(store.count("guides").await, Err(RagError::NotFoundError(_))));
    }

    #[tokio::test]
    async fn rejects_path_like_collection_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileVectorStore::new(dir.path());
        let err = store.create_collection("../escape", 2).await.unwrap_err();
        assert!(matches!(err, RagError::VectorStoreError { .. }));
    }
}
