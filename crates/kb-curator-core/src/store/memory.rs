//! In-memory [`KnowledgeStore`] implementation for tests and local snapshots.
//!
//! Collections live in insertion-ordered `Vec`s behind `std::sync::RwLock`.
//! Saving or dropping an override also updates the document's
//! `manually_changed` flag and clears any conflict recorded for it, the way
//! the production admin API does.

use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{AnswerSet, ConflictRef, DocumentSummary, UnknownQuery};

use super::{KnowledgeStore, SnapshotDocument, StoreError, StoreSnapshot, StoredDocument};

/// In-memory store.
pub struct InMemoryStore {
    docs: RwLock<Vec<SnapshotDocument>>,
    conflicts: RwLock<Vec<ConflictRef>>,
    unknown: RwLock<Vec<UnknownQuery>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::from_snapshot(StoreSnapshot::default())
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            docs: RwLock::new(snapshot.documents),
            conflicts: RwLock::new(snapshot.conflicts),
            unknown: RwLock::new(snapshot.unknown_queries),
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            documents: self.docs.read().unwrap().clone(),
            conflicts: self.conflicts.read().unwrap().clone(),
            unknown_queries: self.unknown.read().unwrap().clone(),
        }
    }

    /// Replaces every collection with the contents of `snapshot`.
    ///
    /// All three locks are held together, so no reader sees a mix of old and
    /// restored collections.
    pub fn restore(&self, snapshot: StoreSnapshot) {
        let mut docs = self.docs.write().unwrap();
        let mut conflicts = self.conflicts.write().unwrap();
        let mut unknown = self.unknown.write().unwrap();
        *docs = snapshot.documents;
        *conflicts = snapshot.conflicts;
        *unknown = snapshot.unknown_queries;
    }

    /// Adds a scraped document and returns its newly assigned id.
    pub fn add_document(&self, url: &str, title: Option<&str>, automatic: AnswerSet) -> String {
        let id = Uuid::new_v4().to_string();
        self.insert_document(&id, url, title, automatic);
        id
    }

    /// Inserts or replaces a scraped document under a known id.
    pub fn insert_document(&self, id: &str, url: &str, title: Option<&str>, automatic: AnswerSet) {
        let document = StoredDocument {
            url: url.to_string(),
            title: title.map(str::to_string),
            automatic,
            manual: None,
            manually_changed: false,
        };
        let mut docs = self.docs.write().unwrap();
        match docs.iter_mut().find(|d| d.id == id) {
            Some(existing) => existing.document = document,
            None => docs.push(SnapshotDocument {
                id: id.to_string(),
                document,
            }),
        }
    }

    /// Flags a document for manual review. No-op if already flagged.
    pub fn flag_conflict(&self, id: &str, title: Option<&str>) {
        let mut conflicts = self.conflicts.write().unwrap();
        if conflicts.iter().any(|c| c.id == id) {
            return;
        }
        conflicts.push(ConflictRef {
            id: id.to_string(),
            title: title.map(str::to_string),
        });
    }

    /// Records a query the bot could not answer. No-op if already recorded.
    pub fn record_unknown_query(&self, text: &str) {
        let mut unknown = self.unknown.write().unwrap();
        if unknown.iter().any(|q| q.text == text) {
            return;
        }
        unknown.push(UnknownQuery::new(text));
    }

    fn remove_conflict(&self, id: &str) -> bool {
        let mut conflicts = self.conflicts.write().unwrap();
        let before = conflicts.len();
        conflicts.retain(|c| c.id != id);
        conflicts.len() != before
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryStore {
    async fn find_by_url(&self, url: &str) -> Result<Vec<DocumentSummary>, StoreError> {
        let docs = self.docs.read().unwrap();
        Ok(docs
            .iter()
            .filter(|d| d.document.url == url)
            .map(|d| DocumentSummary {
                id: d.id.clone(),
                title: d.document.title.clone(),
            })
            .collect())
    }

    async fn fetch_document(&self, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        let docs = self.docs.read().unwrap();
        Ok(docs.iter().find(|d| d.id == id).map(|d| d.document.clone()))
    }

    async fn put_override(&self, id: &str, content: &AnswerSet) -> Result<(), StoreError> {
        {
            let mut docs = self.docs.write().unwrap();
            let stored = docs
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or_else(|| StoreError::UnknownDocument(id.to_string()))?;
            stored.document.manual = Some(content.clone());
            stored.document.manually_changed = true;
        }
        self.remove_conflict(id);
        Ok(())
    }

    async fn delete_override(&self, id: &str) -> Result<bool, StoreError> {
        let removed = {
            let mut docs = self.docs.write().unwrap();
            match docs.iter_mut().find(|d| d.id == id) {
                Some(stored) => {
                    stored.document.manually_changed = false;
                    stored.document.manual.take().is_some()
                }
                None => false,
            }
        };
        if removed {
            self.remove_conflict(id);
        }
        Ok(removed)
    }

    async fn conflicts(&self) -> Result<Vec<ConflictRef>, StoreError> {
        Ok(self.conflicts.read().unwrap().clone())
    }

    async fn delete_conflict(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.remove_conflict(id))
    }

    async fn unknown_queries(&self) -> Result<Vec<UnknownQuery>, StoreError> {
        Ok(self.unknown.read().unwrap().clone())
    }

    async fn delete_unknown_query(&self, text: &str) -> Result<bool, StoreError> {
        let mut unknown = self.unknown.write().unwrap();
        match unknown.iter().position(|q| q.text == text) {
            Some(pos) => {
                unknown.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
