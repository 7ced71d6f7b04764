//! [`KnowledgeStore`] backed by the chatbot's web admin API.
//!
//! # Endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `GET`    | `/v1/web/docs/?url=<url>` | Documents scraped from a page (`[{id, title}]`) |
//! | `GET`    | `/v1/web/content/?id=<id>` | `{prod, manual, url}`; `prod: null` means unknown id |
//! | `POST`   | `/v1/web/content/` | Replace the override (`{"data": {id, content}}`) |
//! | `DELETE` | `/v1/web/doc` | Drop the override (`{"data": {id}}`) |
//! | `GET`    | `/v1/web/conflict_ids` | Documents flagged for review (`[{id, title}]`) |
//! | `DELETE` | `/v2/conflict_ids/{id}/` | Dismiss a conflict; `404` if absent |
//! | `GET`    | `/v1/web/unknown_queries` | Unanswered queries (`[{query_text}]`) |
//! | `DELETE` | `/v1/web/unknown_query` | Remove a query (`{"data": {query_text}}`) |
//!
//! The v1 write endpoints answer success whether or not anything matched, so
//! `put_override`, `delete_override` and `delete_unknown_query` read first to
//! decide between [`StoreError::UnknownDocument`], `false` and a real write.
//! The check and the write are two requests; a concurrent change in between
//! is not detected.
//!
//! Any non-success status is [`StoreError::Status`]. Conflict bookkeeping on
//! save and delete is the server's responsibility.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use kb_curator_core::store::{KnowledgeStore, StoreError, StoredDocument};
use kb_curator_core::{AnswerSet, ConflictRef, DocumentSummary, UnknownQuery};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct HttpStore {
    client: reqwest::Client,
    base_url: Url,
}

/// Request envelope used by every v1 write endpoint.
#[derive(Serialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Serialize)]
struct OverrideBody<'a> {
    id: &'a str,
    content: &'a AnswerSet,
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct UnknownQueryBody<'a> {
    query_text: &'a str,
}

/// Response of `GET /v1/web/content/`.
#[derive(Debug, Deserialize)]
struct ContentResponse {
    prod: Option<ProdContent>,
    manual: Option<AnswerSet>,
    url: Option<String>,
}

/// Scraped content; the title travels inside it.
#[derive(Debug, Deserialize)]
struct ProdContent {
    #[serde(default)]
    title: Option<String>,
    #[serde(flatten)]
    answers: AnswerSet,
}

impl ContentResponse {
    fn into_stored(self) -> Option<StoredDocument> {
        let prod = self.prod?;
        Some(StoredDocument {
            url: self.url.unwrap_or_default(),
            title: prod.title,
            automatic: prod.answers,
            manually_changed: self.manual.is_some(),
            manual: self.manual,
        })
    }
}

impl HttpStore {
    /// `base_url` should be like `http://localhost:8080`, optionally with a
    /// path prefix the API is mounted under.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid store base_url: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("store base_url cannot be a base: {}", base_url);
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }

    /// Appends `segments` to the base path. Each segment is percent-encoded;
    /// a trailing `""` produces a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch_content(&self, id: &str) -> std::result::Result<ContentResponse, StoreError> {
        debug!(id, "GET content");
        let resp = self
            .client
            .get(self.endpoint(&["v1", "web", "content", ""]))
            .query(&[("id", id)])
            .send()
            .await
            .map_err(transport)?;
        expect_json(resp).await
    }
}

fn transport(e: reqwest::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

async fn status_error(resp: Response) -> StoreError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    StoreError::Status { status, body }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> std::result::Result<T, StoreError> {
    let bytes = resp.bytes().await.map_err(transport)?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode(e.to_string()))
}

/// Decodes a successful response, or turns a failure status into an error.
async fn expect_json<T: DeserializeOwned>(resp: Response) -> std::result::Result<T, StoreError> {
    if !resp.status().is_success() {
        return Err(status_error(resp).await);
    }
    decode(resp).await
}

async fn expect_success(resp: Response) -> std::result::Result<(), StoreError> {
    if !resp.status().is_success() {
        return Err(status_error(resp).await);
    }
    Ok(())
}

#[async_trait]
impl KnowledgeStore for HttpStore {
    async fn find_by_url(
        &self,
        url: &str,
    ) -> std::result::Result<Vec<DocumentSummary>, StoreError> {
        debug!(url, "GET docs by url");
        let resp = self
            .client
            .get(self.endpoint(&["v1", "web", "docs", ""]))
            .query(&[("url", url)])
            .send()
            .await
            .map_err(transport)?;
        expect_json(resp).await
    }

    async fn fetch_document(
        &self,
        id: &str,
    ) -> std::result::Result<Option<StoredDocument>, StoreError> {
        Ok(self.fetch_content(id).await?.into_stored())
    }

    async fn put_override(
        &self,
        id: &str,
        content: &AnswerSet,
    ) -> std::result::Result<(), StoreError> {
        if self.fetch_content(id).await?.prod.is_none() {
            return Err(StoreError::UnknownDocument(id.to_string()));
        }
        debug!(id, "POST content");
        let resp = self
            .client
            .post(self.endpoint(&["v1", "web", "content", ""]))
            .json(&Envelope {
                data: OverrideBody { id, content },
            })
            .send()
            .await
            .map_err(transport)?;
        expect_success(resp).await
    }

    async fn delete_override(&self, id: &str) -> std::result::Result<bool, StoreError> {
        if self.fetch_content(id).await?.manual.is_none() {
            return Ok(false);
        }
        debug!(id, "DELETE doc");
        let resp = self
            .client
            .delete(self.endpoint(&["v1", "web", "doc"]))
            .json(&Envelope {
                data: DocumentRef { id },
            })
            .send()
            .await
            .map_err(transport)?;
        expect_success(resp).await.map(|()| true)
    }

    async fn conflicts(&self) -> std::result::Result<Vec<ConflictRef>, StoreError> {
        let resp = self
            .client
            .get(self.endpoint(&["v1", "web", "conflict_ids"]))
            .send()
            .await
            .map_err(transport)?;
        expect_json(resp).await
    }

    async fn delete_conflict(&self, id: &str) -> std::result::Result<bool, StoreError> {
        debug!(id, "DELETE conflict");
        let resp = self
            .client
            .delete(self.endpoint(&["v2", "conflict_ids", id, ""]))
            .send()
            .await
            .map_err(transport)?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            _ => Err(status_error(resp).await),
        }
    }

    async fn unknown_queries(&self) -> std::result::Result<Vec<UnknownQuery>, StoreError> {
        let resp = self
            .client
            .get(self.endpoint(&["v1", "web", "unknown_queries"]))
            .send()
            .await
            .map_err(transport)?;
        expect_json(resp).await
    }

    async fn delete_unknown_query(&self, text: &str) -> std::result::Result<bool, StoreError> {
        if !self.unknown_queries().await?.iter().any(|q| q.text == text) {
            return Ok(false);
        }
        debug!(query = text, "DELETE unknown query");
        let resp = self
            .client
            .delete(self.endpoint(&["v1", "web", "unknown_query"]))
            .json(&Envelope {
                data: UnknownQueryBody { query_text: text },
            })
            .send()
            .await
            .map_err(transport)?;
        expect_success(resp).await.map(|()| true)
    }
}
