//! Document retrieval by ID.
//!
//! Shows a document's automatic content, its override (if any), and which of
//! the two the bot currently answers with.

use anyhow::Result;
use kb_curator_core::{AnswerSet, Document, ReconciliationService};
use serde::Serialize;

use crate::config::Config;
use crate::store;

/// JSON shape printed by `kbc get --json`.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView<'a> {
    pub id: &'a str,
    pub url: &'a str,
    pub title: Option<&'a str>,
    pub automatic: &'a AnswerSet,
    #[serde(rename = "override")]
    pub manual: Option<&'a AnswerSet>,
    pub effective: &'a AnswerSet,
}

impl<'a> From<&'a Document> for DocumentView<'a> {
    fn from(doc: &'a Document) -> Self {
        Self {
            id: &doc.id,
            url: &doc.url,
            title: doc.title.as_deref(),
            automatic: &doc.automatic,
            manual: doc.manual.as_ref(),
            effective: doc.effective(),
        }
    }
}

/// CLI entry point for `kbc get <id>`.
pub async fn run_get(config: &Config, id: &str, json: bool) -> Result<()> {
    let service = ReconciliationService::new(store::connect(config)?);
    let doc = service.load(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&DocumentView::from(&doc))?);
        return Ok(());
    }

    println!("--- Document ---");
    println!("id:       {}", doc.id);
    println!("title:    {}", doc.title.as_deref().unwrap_or("(untitled)"));
    println!("url:      {}", doc.url);
    println!(
        "answers:  {}",
        if doc.has_override() {
            "manual override"
        } else {
            "automatic"
        }
    );
    println!();

    println!("--- Automatic ---");
    print_answer_set(&doc.automatic);

    println!("--- Override ---");
    match &doc.manual {
        Some(manual) => print_answer_set(manual),
        None => {
            println!("(none)");
            println!();
        }
    }

    Ok(())
}

pub fn print_answer_set(set: &AnswerSet) {
    println!("texts ({}):", set.texts.len());
    for (i, text) in set.texts.iter().enumerate() {
        println!("  [{}] {}", i, text);
    }
    println!("keywords ({}):", set.keywords.len());
    for (i, keyword) in set.keywords.iter().enumerate() {
        println!("  [{}] {} ({})", i, keyword.text, keyword.confidence);
    }
    println!();
}
