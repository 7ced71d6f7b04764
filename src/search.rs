//! Document lookup by source URL.

use anyhow::Result;
use kb_curator_core::ReconciliationService;

use crate::config::Config;
use crate::store;

/// CLI entry point for `kbc search <url>`.
pub async fn run_search(config: &Config, url: &str) -> Result<()> {
    let service = ReconciliationService::new(store::connect(config)?);
    let hits = service.search(url).await?;

    if hits.is_empty() {
        println!("No documents found for {}", url);
        return Ok(());
    }

    println!("{:<38} TITLE", "ID");
    for hit in &hits {
        println!(
            "{:<38} {}",
            hit.id,
            hit.title.as_deref().unwrap_or("(untitled)")
        );
    }
    Ok(())
}
