//! Document-level read/write semantics over a [`KnowledgeStore`].
//!
//! [`ReconciliationService`] is the only component that talks to the store on
//! behalf of editors. It loads documents, resolves their effective content,
//! and persists or drops manual overrides.
//!
//! # Rules
//!
//! - An override replaces the automatic content as a whole. Nothing is merged.
//! - A save is validated locally before any store call.
//! - A failed save leaves the previously stored override as it was.
//! - There is no version check: two saves for the same id race and the last
//!   write wins.
//! - Clearing a document that has no override fails with
//!   [`CurateError::NotFound`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::editor::{validate, PersistRequest, Validation, WorkingOverride};
use crate::error::{CurateError, Result};
use crate::models::{AnswerSet, Document, DocumentSummary};
use crate::store::{KnowledgeStore, StoreError};

#[derive(Clone)]
pub struct ReconciliationService {
    store: Arc<dyn KnowledgeStore>,
}

impl ReconciliationService {
    pub fn new(store: Arc<dyn KnowledgeStore>) -> Self {
        Self { store }
    }

    /// Documents scraped from `url`. No matches is an empty list, not an error.
    pub async fn search(&self, url: &str) -> Result<Vec<DocumentSummary>> {
        let hits = self
            .store
            .find_by_url(url)
            .await
            .map_err(CurateError::Fetch)?;
        debug!(url, count = hits.len(), "searched documents by url");
        Ok(hits)
    }

    pub async fn load(&self, id: &str) -> Result<Document> {
        let stored = self
            .store
            .fetch_document(id)
            .await
            .map_err(CurateError::Fetch)?
            .ok_or_else(|| CurateError::not_found("document", id))?;
        Ok(stored.into_document(id))
    }

    /// The content the bot answers with for `id`.
    pub async fn effective(&self, id: &str) -> Result<AnswerSet> {
        let doc = self.load(id).await?;
        Ok(doc.effective().clone())
    }

    /// Stores `content` as the override for `id`, replacing any prior one.
    pub async fn save(&self, id: &str, content: &AnswerSet) -> Result<()> {
        if let Validation::Invalid { offending_indices } = validate(content) {
            warn!(id, ?offending_indices, "refusing to save invalid override");
            return Err(CurateError::Validation { offending_indices });
        }
        match self.store.put_override(id, content).await {
            Ok(()) => {
                info!(
                    id,
                    texts = content.texts.len(),
                    keywords = content.keywords.len(),
                    "saved override"
                );
                Ok(())
            }
            Err(StoreError::UnknownDocument(_)) => Err(CurateError::not_found("document", id)),
            Err(e) => Err(CurateError::Persist(e)),
        }
    }

    pub async fn persist(&self, request: &PersistRequest) -> Result<()> {
        self.save(&request.id, &request.content).await
    }

    /// Commits a working copy and saves it. Invalid copies never reach the store.
    pub async fn commit(&self, working: WorkingOverride) -> Result<()> {
        let request = working.commit()?;
        self.persist(&request).await
    }

    /// Drops the override so the document reverts to its automatic content.
    pub async fn clear_override(&self, id: &str) -> Result<()> {
        let removed = self
            .store
            .delete_override(id)
            .await
            .map_err(CurateError::Persist)?;
        if !removed {
            return Err(CurateError::not_found("override", id));
        }
        info!(id, "cleared override");
        Ok(())
    }
}
