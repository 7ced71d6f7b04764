//! # KB Curator
//!
//! Administrative tooling for a chatbot's knowledge base.
//!
//! Documents are scraped from web pages into automatic content (answer texts
//! plus weighted keywords). Operators review flagged documents, override any
//! document with a manual answer set that takes precedence, and clear the
//! queue of questions the bot could not answer.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────────────────┐   ┌──────────────────┐
//! │  kbc (CLI)   │──▶│ kb-curator-core          │──▶│ KnowledgeStore   │
//! │ config, logs │   │ WorkingOverride          │   │ HttpStore (API)  │
//! └──────────────┘   │ ReconciliationService    │   │ FileStore (JSON) │
//!                    │ ReviewQueue              │   └──────────────────┘
//!                    └─────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`store`] | Opens the configured store |
//! | [`http_store`] | Admin HTTP API store |
//! | [`file_store`] | JSON snapshot file store |
//! | [`search`] | `kbc search` |
//! | [`get`] | `kbc get` |
//! | [`edit`] | `kbc edit`, `kbc put`, `kbc revert` |
//! | [`review`] | `kbc conflicts`, `kbc dismiss`, `kbc unknown`, `kbc resolve` |

pub mod config;
pub mod edit;
pub mod file_store;
pub mod get;
pub mod http_store;
pub mod logging;
pub mod review;
pub mod search;
pub mod store;
