//! # KB Curator Core
//!
//! The content override and reconciliation model behind the chatbot
//! knowledge-base curator: answer-set values, override staging and
//! validation, the store abstraction, document reconciliation, and the
//! operator review queue.
//!
//! This crate contains no tokio, HTTP, or filesystem I/O. Store backends
//! live in the `kb-curator` crate or in the host application.

pub mod edit;
pub mod editor;
pub mod error;
pub mod models;
pub mod reconcile;
pub mod review;
pub mod store;

pub use edit::EditOp;
pub use editor::{validate, PersistRequest, Validation, WorkingOverride};
pub use error::{CurateError, Result};
pub use models::{AnswerSet, ConflictRef, Document, DocumentSummary, Keyword, UnknownQuery};
pub use reconcile::ReconciliationService;
pub use review::ReviewQueue;
pub use store::{KnowledgeStore, StoreError, StoredDocument};
