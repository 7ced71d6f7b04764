//! Operator review queue: flagged documents and unanswered queries.
//!
//! Every listing is a full refresh from the store, returned in store order.
//! The queue remembers only the most recent listing of each kind.

use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::error::{CurateError, Result};
use crate::models::{ConflictRef, UnknownQuery};
use crate::store::KnowledgeStore;

pub struct ReviewQueue {
    store: Arc<dyn KnowledgeStore>,
    last_conflicts: RwLock<Vec<ConflictRef>>,
    last_unknown: RwLock<Vec<UnknownQuery>>,
}

impl ReviewQueue {
    pub fn new(store: Arc<dyn KnowledgeStore>) -> Self {
        Self {
            store,
            last_conflicts: RwLock::new(Vec::new()),
            last_unknown: RwLock::new(Vec::new()),
        }
    }

    pub async fn list_conflicts(&self) -> Result<Vec<ConflictRef>> {
        let conflicts = self.store.conflicts().await.map_err(CurateError::Fetch)?;
        debug!(count = conflicts.len(), "fetched conflicts");
        *self.last_conflicts.write().unwrap() = conflicts.clone();
        Ok(conflicts)
    }

    pub async fn list_unknown_queries(&self) -> Result<Vec<UnknownQuery>> {
        let queries = self
            .store
            .unknown_queries()
            .await
            .map_err(CurateError::Fetch)?;
        debug!(count = queries.len(), "fetched unknown queries");
        *self.last_unknown.write().unwrap() = queries.clone();
        Ok(queries)
    }

    /// Deletes the unknown query whose text equals `text` exactly.
    ///
    /// Fails with [`CurateError::NotFound`] if it is already gone, e.g. removed
    /// by another operator. Callers should treat that as non-fatal and refresh.
    pub async fn resolve_unknown_query(&self, text: &str) -> Result<()> {
        let removed = self
            .store
            .delete_unknown_query(text)
            .await
            .map_err(CurateError::Persist)?;
        if !removed {
            return Err(CurateError::not_found("unknown query", text));
        }
        info!(query = text, "resolved unknown query");
        Ok(())
    }

    /// Removes the conflict flag for `id` without touching its content.
    pub async fn dismiss_conflict(&self, id: &str) -> Result<()> {
        let removed = self
            .store
            .delete_conflict(id)
            .await
            .map_err(CurateError::Persist)?;
        if !removed {
            return Err(CurateError::not_found("conflict", id));
        }
        info!(id, "dismissed conflict");
        Ok(())
    }

    /// Conflicts from the last successful [`list_conflicts`](Self::list_conflicts).
    pub fn last_conflicts(&self) -> Vec<ConflictRef> {
        self.last_conflicts.read().unwrap().clone()
    }

    /// Queries from the last successful
    /// [`list_unknown_queries`](Self::list_unknown_queries).
    pub fn last_unknown_queries(&self) -> Vec<UnknownQuery> {
        self.last_unknown.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerSet, Keyword};
    use crate::reconcile::ReconciliationService;
    use crate::store::memory::InMemoryStore;

    fn setup() -> (Arc<InMemoryStore>, ReviewQueue) {
        let store = Arc::new(InMemoryStore::new());
        for q in ["opening hours", "weather tomorrow", "parking"] {
            store.record_unknown_query(q);
        }
        let queue = ReviewQueue::new(store.clone());
        (store, queue)
    }

    #[tokio::test]
    async fn test_resolve_removes_exactly_one_entry() {
        let (_, queue) = setup();
        let before = queue.list_unknown_queries().await.unwrap();
        assert_eq!(before.len(), 3);

        queue.resolve_unknown_query("weather tomorrow").await.unwrap();

        let after = queue.list_unknown_queries().await.unwrap();
        assert_eq!(
            after,
            vec![
                UnknownQuery::new("opening hours"),
                UnknownQuery::new("parking")
            ]
        );
    }

    #[tokio::test]
    async fn test_resolve_twice_is_not_found() {
        let (_, queue) = setup();
        queue.resolve_unknown_query("parking").await.unwrap();
        let err = queue.resolve_unknown_query("parking").await.unwrap_err();
        assert!(matches!(err, CurateError::NotFound { what: "unknown query", .. }));
        assert_eq!(queue.list_unknown_queries().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_lists_are_success() {
        let queue = ReviewQueue::new(Arc::new(InMemoryStore::new()));
        assert!(queue.list_conflicts().await.unwrap().is_empty());
        assert!(queue.list_unknown_queries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_conflicts_keep_store_order_and_refresh() {
        let (store, queue) = setup();
        store.flag_conflict("b", Some("B"));
        store.flag_conflict("a", Some("A"));
        let ids: Vec<String> = queue
            .list_conflicts()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(queue.last_conflicts().len(), 2);

        store.flag_conflict("c", None);
        assert_eq!(queue.last_conflicts().len(), 2);
        assert_eq!(queue.list_conflicts().await.unwrap().len(), 3);
        assert_eq!(queue.last_conflicts().len(), 3);
    }

    #[tokio::test]
    async fn test_saving_override_resolves_conflict() {
        let (store, queue) = setup();
        store.insert_document(
            "D1",
            "https://example.org",
            Some("Page"),
            AnswerSet::new(vec!["Hi".into()], vec![Keyword::new("hei", 1.0)]),
        );
        store.flag_conflict("D1", Some("Page"));
        assert_eq!(queue.list_conflicts().await.unwrap().len(), 1);

        let service = ReconciliationService::new(store.clone());
        service
            .save("D1", &AnswerSet::new(vec!["Hello".into()], vec![]))
            .await
            .unwrap();
        assert!(queue.list_conflicts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dismiss_conflict() {
        let (store, queue) = setup();
        store.flag_conflict("D9", None);
        queue.dismiss_conflict("D9").await.unwrap();
        assert!(queue.list_conflicts().await.unwrap().is_empty());
        assert!(queue.dismiss_conflict("D9").await.unwrap_err().is_not_found());
    }
}
