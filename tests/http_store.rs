//! Integration tests for the HTTP store adapter.
//!
//! Each test starts a small axum server that serves the admin API on top of
//! an `InMemoryStore`, then drives it through `HttpStore` and the core
//! services.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use kb_curator::http_store::HttpStore;
use kb_curator_core::store::memory::InMemoryStore;
use kb_curator_core::{
    AnswerSet, CurateError, EditOp, Keyword, KnowledgeStore, ReconciliationService, ReviewQueue,
    StoreError, UnknownQuery, WorkingOverride,
};
use serde::Deserialize;
use serde_json::json;

// ─── Mock admin API ─────────────────────────────────────────────────

/// Backing store plus a count of write requests that reached the server.
struct Backend {
    store: InMemoryStore,
    writes: AtomicUsize,
}

type Shared = Arc<Backend>;

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ContentBody {
    id: String,
    content: AnswerSet,
}

#[derive(Deserialize)]
struct DocBody {
    id: String,
}

#[derive(Deserialize)]
struct QueryBody {
    query_text: String,
}

fn success() -> Response {
    Json(json!({"status": "Success"})).into_response()
}

async fn docs(State(api): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Response {
    let url = q.get("url").cloned().unwrap_or_default();
    Json(api.store.find_by_url(&url).await.unwrap()).into_response()
}

async fn get_content(
    State(api): State<Shared>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    let id = q.get("id").cloned().unwrap_or_default();
    let body = match api.store.fetch_document(&id).await.unwrap() {
        Some(doc) => json!({
            "prod": {
                "title": doc.title,
                "texts": doc.automatic.texts,
                "keywords": doc.automatic.keywords,
            },
            "manual": doc.manual,
            "url": doc.url,
        }),
        None => json!({"prod": null, "manual": null, "url": null}),
    };
    Json(body).into_response()
}

async fn post_content(
    State(api): State<Shared>,
    Json(body): Json<Envelope<ContentBody>>,
) -> Response {
    api.writes.fetch_add(1, Ordering::SeqCst);
    match api.store.put_override(&body.data.id, &body.data.content).await {
        Ok(()) => success(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn delete_doc(State(api): State<Shared>, Json(body): Json<Envelope<DocBody>>) -> Response {
    api.writes.fetch_add(1, Ordering::SeqCst);
    api.store.delete_override(&body.data.id).await.unwrap();
    success()
}

async fn conflicts(State(api): State<Shared>) -> Response {
    Json(api.store.conflicts().await.unwrap()).into_response()
}

async fn delete_conflict(State(api): State<Shared>, Path(id): Path<String>) -> Response {
    api.writes.fetch_add(1, Ordering::SeqCst);
    if api.store.delete_conflict(&id).await.unwrap() {
        Json(json!({"acknowledged": true, "deleted_count": 1})).into_response()
    } else {
        (StatusCode::NOT_FOUND, "Conflict not found").into_response()
    }
}

async fn unknown(State(api): State<Shared>) -> Response {
    Json(api.store.unknown_queries().await.unwrap()).into_response()
}

async fn delete_unknown(
    State(api): State<Shared>,
    Json(body): Json<Envelope<QueryBody>>,
) -> Response {
    api.writes.fetch_add(1, Ordering::SeqCst);
    api.store
        .delete_unknown_query(&body.data.query_text)
        .await
        .unwrap();
    success()
}

fn admin_api(api: Shared) -> Router {
    Router::new()
        .route("/v1/web/docs/", get(docs))
        .route("/v1/web/content/", get(get_content).post(post_content))
        .route("/v1/web/doc", delete(delete_doc))
        .route("/v1/web/conflict_ids", get(conflicts))
        .route("/v2/conflict_ids/{id}/", delete(delete_conflict))
        .route("/v1/web/unknown_queries", get(unknown))
        .route("/v1/web/unknown_query", delete(delete_unknown))
        .with_state(api)
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn seeded_backend() -> Shared {
    let store = InMemoryStore::new();
    store.insert_document(
        "D1",
        "https://www.trondheim.kommune.no/parkering/",
        Some("Parkering"),
        AnswerSet::new(vec!["Hi".into()], vec![Keyword::new("hei", 1.0)]),
    );
    store.insert_document(
        "D2",
        "https://www.trondheim.kommune.no/parkering/",
        Some("Beboerparkering"),
        AnswerSet::new(vec!["Søk om kort".into()], vec![]),
    );
    store.flag_conflict("D2", Some("Beboerparkering"));
    for q in ["opening hours", "weather tomorrow", "parking fine"] {
        store.record_unknown_query(q);
    }
    Arc::new(Backend {
        store,
        writes: AtomicUsize::new(0),
    })
}

async fn http_store(backend: Shared) -> Arc<HttpStore> {
    let base = serve(admin_api(backend)).await;
    Arc::new(HttpStore::new(&base, Duration::from_secs(5)).unwrap())
}

// ─── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn search_returns_summaries_in_store_order() {
    let service = ReconciliationService::new(http_store(seeded_backend()).await);

    let hits = service
        .search("https://www.trondheim.kommune.no/parkering/")
        .await
        .unwrap();
    let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["D1", "D2"]);
    assert_eq!(hits[1].title.as_deref(), Some("Beboerparkering"));

    assert!(service.search("https://nowhere").await.unwrap().is_empty());
}

#[tokio::test]
async fn load_unknown_id_is_not_found() {
    let service = ReconciliationService::new(http_store(seeded_backend()).await);
    let err = service.load("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn d1_edit_save_and_reload_over_http() {
    let backend = seeded_backend();
    let service = ReconciliationService::new(http_store(backend.clone()).await);

    let doc = service.load("D1").await.unwrap();
    assert_eq!(doc.manual, None);
    assert_eq!(doc.title.as_deref(), Some("Parkering"));

    let working = WorkingOverride::begin(&doc)
        .apply_all(&[
            EditOp::AppendKeyword,
            EditOp::ReplaceKeyword {
                index: 1,
                keyword: Keyword::new("yo", 0.8),
            },
        ])
        .unwrap();
    service.commit(working).await.unwrap();

    let expected = AnswerSet::new(
        vec!["Hi".into()],
        vec![Keyword::new("hei", 1.0), Keyword::new("yo", 0.8)],
    );
    let reloaded = service.load("D1").await.unwrap();
    assert_eq!(reloaded.manual, Some(expected.clone()));
    assert_eq!(reloaded.effective(), &expected);

    let stored = backend.store.fetch_document("D1").await.unwrap().unwrap();
    assert!(stored.manually_changed);
}

#[tokio::test]
async fn out_of_range_confidence_round_trips_over_http() {
    let service = ReconciliationService::new(http_store(seeded_backend()).await);
    let content = AnswerSet::new(vec![], vec![Keyword::new("x", 3.5), Keyword::new("y", -1.0)]);
    service.save("D1", &content).await.unwrap();
    assert_eq!(service.load("D1").await.unwrap().manual, Some(content));
}

#[tokio::test]
async fn save_unknown_document_is_not_found() {
    let backend = seeded_backend();
    let service = ReconciliationService::new(http_store(backend.clone()).await);
    let err = service
        .save("ghost", &AnswerSet::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(backend.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn clear_override_over_http() {
    let backend = seeded_backend();
    let service = ReconciliationService::new(http_store(backend.clone()).await);
    service
        .save("D1", &AnswerSet::new(vec!["Manual".into()], vec![]))
        .await
        .unwrap();
    service.clear_override("D1").await.unwrap();

    let doc = service.load("D1").await.unwrap();
    assert_eq!(doc.manual, None);
    assert_eq!(doc.effective(), &doc.automatic);

    let writes = backend.writes.load(Ordering::SeqCst);
    let err = service.clear_override("D1").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(backend.writes.load(Ordering::SeqCst), writes);
}

#[tokio::test]
async fn review_queue_over_http() {
    let queue = ReviewQueue::new(http_store(seeded_backend()).await);

    let conflicts = queue.list_conflicts().await.unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].id, "D2");

    queue.resolve_unknown_query("weather tomorrow").await.unwrap();
    assert_eq!(
        queue.list_unknown_queries().await.unwrap(),
        vec![
            UnknownQuery::new("opening hours"),
            UnknownQuery::new("parking fine")
        ]
    );
    let err = queue
        .resolve_unknown_query("weather tomorrow")
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    queue.dismiss_conflict("D2").await.unwrap();
    assert!(queue.list_conflicts().await.unwrap().is_empty());
}

#[tokio::test]
async fn dismiss_conflict_with_reserved_characters_in_id() {
    let backend = seeded_backend();
    backend.store.flag_conflict("a/b c", None);
    let store = http_store(backend.clone()).await;

    assert!(store.delete_conflict("a/b c").await.unwrap());
    assert!(!store.delete_conflict("a/b c").await.unwrap());
    let ids: Vec<String> = store
        .conflicts()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["D2"]);
}

#[tokio::test]
async fn server_error_surfaces_as_persist_error() {
    let app = Router::new()
        .fallback(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database down") });
    let base = serve(app).await;
    let store = Arc::new(HttpStore::new(&base, Duration::from_secs(5)).unwrap());
    let service = ReconciliationService::new(store.clone());

    let err = service
        .save("D1", &AnswerSet::default())
        .await
        .unwrap_err();
    match err {
        CurateError::Persist(StoreError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "database down");
        }
        other => panic!("expected persist error, got {:?}", other),
    }

    let err = service.search("https://x").await.unwrap_err();
    assert!(matches!(err, CurateError::Fetch(StoreError::Status { status: 500, .. })));
}

#[tokio::test]
async fn malformed_response_is_decode_error() {
    let app = Router::new().fallback(|| async { "definitely not json" });
    let store = HttpStore::new(&serve(app).await, Duration::from_secs(5)).unwrap();
    let err = store.conflicts().await.unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)));
}

#[tokio::test]
async fn unreachable_store_is_unavailable() {
    // Bind and immediately drop a listener to get a closed port.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = HttpStore::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    let err = store.unknown_queries().await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}
