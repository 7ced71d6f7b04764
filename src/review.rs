//! Review queue commands: conflicts and unknown queries.

use anyhow::Result;
use kb_curator_core::ReviewQueue;

use crate::config::Config;
use crate::store;

pub async fn run_conflicts(config: &Config) -> Result<()> {
    let queue = ReviewQueue::new(store::connect(config)?);
    let conflicts = queue.list_conflicts().await?;

    if conflicts.is_empty() {
        println!("No conflicts.");
        return Ok(());
    }

    println!("{:<38} TITLE", "ID");
    for conflict in &conflicts {
        println!(
            "{:<38} {}",
            conflict.id,
            conflict.title.as_deref().unwrap_or("(untitled)")
        );
    }
    Ok(())
}

pub async fn run_dismiss(config: &Config, id: &str) -> Result<()> {
    let queue = ReviewQueue::new(store::connect(config)?);
    queue.dismiss_conflict(id).await?;
    println!("Dismissed conflict {}.", id);
    Ok(())
}

pub async fn run_unknown(config: &Config) -> Result<()> {
    let queue = ReviewQueue::new(store::connect(config)?);
    let queries = queue.list_unknown_queries().await?;

    if queries.is_empty() {
        println!("No unknown queries.");
        return Ok(());
    }

    for query in &queries {
        println!("{}", query.text);
    }
    Ok(())
}

/// Resolving an already-resolved query is reported but not treated as failure.
pub async fn run_resolve(config: &Config, text: &str) -> Result<()> {
    let queue = ReviewQueue::new(store::connect(config)?);
    match queue.resolve_unknown_query(text).await {
        Ok(()) => println!("Resolved unknown query: {}", text),
        Err(e) if e.is_not_found() => {
            println!("Unknown query already resolved: {}", text);
            let remaining = queue.list_unknown_queries().await?;
            println!("{} unknown queries remain.", remaining.len());
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
