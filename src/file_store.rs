//! [`KnowledgeStore`] backed by a JSON snapshot file.
//!
//! The whole file is loaded into an [`InMemoryStore`] on open. Every mutation
//! that changes something rewrites the file (write to a sibling temp file,
//! then rename). If the write fails, the in-memory state is rolled back so
//! the store and the file never disagree.
//!
//! Reads take the same lock as mutations, so a reader never observes a change
//! that a failed write is about to roll back.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use kb_curator_core::store::memory::InMemoryStore;
use kb_curator_core::store::{KnowledgeStore, StoreError, StoreSnapshot, StoredDocument};
use kb_curator_core::{AnswerSet, ConflictRef, DocumentSummary, UnknownQuery};
use tokio::sync::Mutex;
use tracing::debug;

pub struct FileStore {
    path: PathBuf,
    inner: InMemoryStore,
    lock: Mutex<()>,
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl FileStore {
    /// Opens an existing snapshot file.
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read store file: {}", path.display()))?;
        let snapshot: StoreSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse store file: {}", path.display()))?;
        debug!(
            path = %path.display(),
            documents = snapshot.documents.len(),
            "opened store file"
        );
        Ok(Self {
            path: path.to_path_buf(),
            inner: InMemoryStore::from_snapshot(snapshot),
            lock: Mutex::new(()),
        })
    }

    /// Writes `snapshot` to a new file at `path`, creating parent directories.
    pub fn create(path: &Path, snapshot: &StoreSnapshot) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write store file: {}", path.display()))?;
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&self.inner.snapshot())
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Runs a mutation and persists the result. Rolls back on write failure.
    ///
    /// `changed` decides from the mutation's output whether a rewrite is needed.
    async fn mutate<T, F, Fut>(
        &self,
        changed: impl Fn(&T) -> bool,
        op: F,
    ) -> Result<T, StoreError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, StoreError>>,
    {
        let _guard = self.lock.lock().await;
        let before = self.inner.snapshot();
        let out = op().await?;
        if changed(&out) {
            if let Err(e) = self.flush().await {
                self.inner.restore(before);
                return Err(e);
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl KnowledgeStore for FileStore {
    async fn find_by_url(&self, url: &str) -> Result<Vec<DocumentSummary>, StoreError> {
        let _guard = self.lock.lock().await;
        self.inner.find_by_url(url).await
    }

    async fn fetch_document(&self, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        let _guard = self.lock.lock().await;
        self.inner.fetch_document(id).await
    }

    async fn put_override(&self, id: &str, content: &AnswerSet) -> Result<(), StoreError> {
        self.mutate(|_| true, || self.inner.put_override(id, content))
            .await
    }

    async fn delete_override(&self, id: &str) -> Result<bool, StoreError> {
        self.mutate(|removed| *removed, || self.inner.delete_override(id))
            .await
    }

    async fn conflicts(&self) -> Result<Vec<ConflictRef>, StoreError> {
        let _guard = self.lock.lock().await;
        self.inner.conflicts().await
    }

    async fn delete_conflict(&self, id: &str) -> Result<bool, StoreError> {
        self.mutate(|removed| *removed, || self.inner.delete_conflict(id))
            .await
    }

    async fn unknown_queries(&self) -> Result<Vec<UnknownQuery>, StoreError> {
        let _guard = self.lock.lock().await;
        self.inner.unknown_queries().await
    }

    async fn delete_unknown_query(&self, text: &str) -> Result<bool, StoreError> {
        self.mutate(|removed| *removed, || self.inner.delete_unknown_query(text))
            .await
    }
}
