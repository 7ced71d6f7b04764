//! Override editing commands: `kbc edit`, `kbc put`, `kbc revert`.
//!
//! `edit` stages operations against a working copy seeded from the
//! document's effective content, validates it, and saves it only if every
//! keyword is free of whitespace. Nothing reaches the store otherwise.
//!
//! # Operation syntax
//!
//! | `--op` value | Effect |
//! |--------------|--------|
//! | `add-text` | Append an empty answer text |
//! | `set-text:I=VALUE` | Replace answer text `I` |
//! | `remove-text:I` | Remove answer text `I` |
//! | `add-keyword` | Append a blank keyword with confidence 1 |
//! | `set-keyword:I=WORD@CONFIDENCE` | Replace keyword `I` |
//! | `remove-keyword:I` | Remove keyword `I` |

use std::path::Path;

use anyhow::{bail, Context, Result};
use kb_curator_core::{
    AnswerSet, CurateError, EditOp, Keyword, ReconciliationService, Validation, WorkingOverride,
};

use crate::config::Config;
use crate::get::print_answer_set;
use crate::store;

/// Parses one `--op` value into an [`EditOp`].
pub fn parse_edit_op(s: &str) -> Result<EditOp, String> {
    let (name, arg) = match s.split_once(':') {
        Some((name, arg)) => (name, Some(arg)),
        None => (s, None),
    };
    match (name, arg) {
        ("add-text", None) => Ok(EditOp::AppendText),
        ("add-keyword", None) => Ok(EditOp::AppendKeyword),
        ("remove-text", Some(arg)) => Ok(EditOp::RemoveText {
            index: parse_index(arg)?,
        }),
        ("remove-keyword", Some(arg)) => Ok(EditOp::RemoveKeyword {
            index: parse_index(arg)?,
        }),
        ("set-text", Some(arg)) => {
            let (index, value) = split_assignment(arg)?;
            Ok(EditOp::ReplaceText {
                index,
                value: value.to_string(),
            })
        }
        ("set-keyword", Some(arg)) => {
            let (index, value) = split_assignment(arg)?;
            let (word, confidence) = match value.rsplit_once('@') {
                Some((word, c)) => (
                    word,
                    c.parse::<f64>()
                        .map_err(|_| format!("invalid confidence '{}'", c))?,
                ),
                None => (value, 1.0),
            };
            Ok(EditOp::ReplaceKeyword {
                index,
                keyword: Keyword::new(word, confidence),
            })
        }
        _ => Err(format!(
            "invalid edit operation '{}'; expected add-text, set-text:I=VALUE, remove-text:I, \
             add-keyword, set-keyword:I=WORD@CONFIDENCE, or remove-keyword:I",
            s
        )),
    }
}

fn parse_index(s: &str) -> Result<usize, String> {
    s.trim()
        .parse::<usize>()
        .map_err(|_| format!("invalid index '{}'", s))
}

fn split_assignment(s: &str) -> Result<(usize, &str), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid I=VALUE: no '=' found in '{}'", s))?;
    Ok((parse_index(&s[..pos])?, &s[pos + 1..]))
}

/// Stages `ops` against a working copy of `id` and returns it with its validation.
pub async fn stage(
    service: &ReconciliationService,
    id: &str,
    ops: &[EditOp],
) -> Result<(WorkingOverride, Validation)> {
    let doc = service.load(id).await?;
    let working = WorkingOverride::begin(&doc).apply_all(ops)?;
    let validation = working.validate();
    Ok((working, validation))
}

/// CLI entry point for `kbc edit <id> --op ...`.
pub async fn run_edit(config: &Config, id: &str, ops: &[EditOp], dry_run: bool) -> Result<()> {
    let service = ReconciliationService::new(store::connect(config)?);
    let (working, validation) = stage(&service, id, ops).await?;

    println!("--- Staged override for {} ---", id);
    print_answer_set(working.content());

    if let Validation::Invalid { offending_indices } = validation {
        report_invalid(working.content(), &offending_indices);
        bail!("override for {} not saved: keywords must not contain whitespace", id);
    }

    if dry_run {
        println!("Dry run: override is valid and was not saved.");
        return Ok(());
    }

    service.commit(working).await?;
    println!("Saved override for {}.", id);
    Ok(())
}

/// CLI entry point for `kbc put <id> <file>`: saves an answer set read from JSON.
pub async fn run_put(config: &Config, id: &str, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read answer set: {}", file.display()))?;
    let content: AnswerSet = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse answer set: {}", file.display()))?;

    let service = ReconciliationService::new(store::connect(config)?);
    match service.save(id, &content).await {
        Ok(()) => {
            println!("Saved override for {}.", id);
            Ok(())
        }
        Err(CurateError::Validation { offending_indices }) => {
            report_invalid(&content, &offending_indices);
            bail!("override for {} not saved: keywords must not contain whitespace", id)
        }
        Err(e) => Err(e.into()),
    }
}

/// CLI entry point for `kbc revert <id>`.
pub async fn run_revert(config: &Config, id: &str) -> Result<()> {
    let service = ReconciliationService::new(store::connect(config)?);
    service.clear_override(id).await?;
    println!("Removed override for {}; automatic content is in effect.", id);
    Ok(())
}

fn report_invalid(content: &AnswerSet, offending_indices: &[usize]) {
    eprintln!("Keywords must not contain whitespace:");
    for &i in offending_indices {
        if let Some(k) = content.keywords.get(i) {
            eprintln!("  [{}] {:?}", i, k.text);
        }
    }
}
