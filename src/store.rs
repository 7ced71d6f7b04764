use anyhow::{Context, Result};
use kb_curator_core::KnowledgeStore;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, StoreKind};
use crate::file_store::FileStore;
use crate::http_store::HttpStore;

/// Opens the store configured in `[store]`.
pub fn connect(config: &Config) -> Result<Arc<dyn KnowledgeStore>> {
    let store = &config.store;
    match store.kind {
        StoreKind::Http => {
            let base_url = store
                .base_url
                .as_deref()
                .context("store.base_url is not set")?;
            let http = HttpStore::new(base_url, Duration::from_secs(store.timeout_secs))?;
            Ok(Arc::new(http))
        }
        StoreKind::File => {
            let path = store.path.as_deref().context("store.path is not set")?;
            Ok(Arc::new(FileStore::open(path)?))
        }
    }
}
