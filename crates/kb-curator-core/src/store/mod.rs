//! Storage abstraction for the curator.
//!
//! The [`KnowledgeStore`] trait is the only way the core reaches the external
//! document store, enabling pluggable backends (the admin HTTP API, a JSON
//! snapshot file, in-memory for tests).
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AnswerSet, ConflictRef, Document, DocumentSummary, UnknownQuery};

/// Failure reported by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed store response: {0}")]
    Decode(String),

    /// A write addressed a document the store does not hold.
    #[error("unknown document: {0}")]
    UnknownDocument(String),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One document as held by the store.
///
/// Matches the `GET content` response shape: `{automatic, override, url, title}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    pub automatic: AnswerSet,
    #[serde(rename = "override", default)]
    pub manual: Option<AnswerSet>,
    /// Set when an override is saved, cleared when it is dropped.
    #[serde(default)]
    pub manually_changed: bool,
}

impl StoredDocument {
    pub fn into_document(self, id: impl Into<String>) -> Document {
        Document {
            id: id.into(),
            url: self.url,
            title: self.title,
            automatic: self.automatic,
            manual: self.manual,
        }
    }
}

/// Abstract document store.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`find_by_url`](KnowledgeStore::find_by_url) | Documents scraped from a page |
/// | [`fetch_document`](KnowledgeStore::fetch_document) | Automatic + override content for one id |
/// | [`put_override`](KnowledgeStore::put_override) | Replace a document's override |
/// | [`delete_override`](KnowledgeStore::delete_override) | Drop a document's override |
/// | [`conflicts`](KnowledgeStore::conflicts) | Documents flagged for review |
/// | [`delete_conflict`](KnowledgeStore::delete_conflict) | Dismiss a conflict flag |
/// | [`unknown_queries`](KnowledgeStore::unknown_queries) | Unanswered user queries |
/// | [`delete_unknown_query`](KnowledgeStore::delete_unknown_query) | Remove a query by exact text |
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Summaries of every document whose source URL equals `url`, in store order.
    async fn find_by_url(&self, url: &str) -> Result<Vec<DocumentSummary>, StoreError>;

    /// Returns `None` if the id is unknown.
    async fn fetch_document(&self, id: &str) -> Result<Option<StoredDocument>, StoreError>;

    /// Replaces the override wholesale. Fails with
    /// [`StoreError::UnknownDocument`] if the id is unknown.
    async fn put_override(&self, id: &str, content: &AnswerSet) -> Result<(), StoreError>;

    /// Returns `false` if the document had no override.
    async fn delete_override(&self, id: &str) -> Result<bool, StoreError>;

    async fn conflicts(&self) -> Result<Vec<ConflictRef>, StoreError>;

    /// Returns `false` if no conflict was recorded for `id`.
    async fn delete_conflict(&self, id: &str) -> Result<bool, StoreError>;

    async fn unknown_queries(&self) -> Result<Vec<UnknownQuery>, StoreError>;

    /// Returns `false` if no query with exactly this text exists.
    async fn delete_unknown_query(&self, text: &str) -> Result<bool, StoreError>;
}

/// A serializable copy of every collection held by a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub documents: Vec<SnapshotDocument>,
    #[serde(default)]
    pub conflicts: Vec<ConflictRef>,
    #[serde(default)]
    pub unknown_queries: Vec<UnknownQuery>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub id: String,
    #[serde(flatten)]
    pub document: StoredDocument,
}
