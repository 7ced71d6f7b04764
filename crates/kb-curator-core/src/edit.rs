//! Pure editing operations on [`AnswerSet`].
//!
//! Every operation borrows the input and returns a fresh set; the original is
//! never mutated. Positions other than the edited one keep their order.
//! Out-of-range indices fail with [`CurateError::Index`].

use serde::{Deserialize, Serialize};

use crate::error::{CurateError, Result};
use crate::models::{AnswerSet, Keyword};

/// A single staged edit, reified so hosts can queue, log, or replay edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    AppendText,
    ReplaceText { index: usize, value: String },
    RemoveText { index: usize },
    AppendKeyword,
    ReplaceKeyword { index: usize, keyword: Keyword },
    RemoveKeyword { index: usize },
}

impl AnswerSet {
    pub fn append_text(&self) -> AnswerSet {
        let mut next = self.clone();
        next.texts.push(String::new());
        next
    }

    pub fn replace_text_at(&self, index: usize, value: impl Into<String>) -> Result<AnswerSet> {
        check_index(index, self.texts.len())?;
        let mut next = self.clone();
        next.texts[index] = value.into();
        Ok(next)
    }

    pub fn remove_text_at(&self, index: usize) -> Result<AnswerSet> {
        check_index(index, self.texts.len())?;
        let mut next = self.clone();
        next.texts.remove(index);
        Ok(next)
    }

    /// Appends a blank keyword with confidence `1.0`.
    pub fn append_keyword(&self) -> AnswerSet {
        let mut next = self.clone();
        next.keywords.push(Keyword::blank());
        next
    }

    pub fn replace_keyword_at(&self, index: usize, keyword: Keyword) -> Result<AnswerSet> {
        check_index(index, self.keywords.len())?;
        let mut next = self.clone();
        next.keywords[index] = keyword;
        Ok(next)
    }

    pub fn remove_keyword_at(&self, index: usize) -> Result<AnswerSet> {
        check_index(index, self.keywords.len())?;
        let mut next = self.clone();
        next.keywords.remove(index);
        Ok(next)
    }

    /// Applies one [`EditOp`], returning the edited copy.
    pub fn apply(&self, op: &EditOp) -> Result<AnswerSet> {
        match op {
            EditOp::AppendText => Ok(self.append_text()),
            EditOp::ReplaceText { index, value } => self.replace_text_at(*index, value.clone()),
            EditOp::RemoveText { index } => self.remove_text_at(*index),
            EditOp::AppendKeyword => Ok(self.append_keyword()),
            EditOp::ReplaceKeyword { index, keyword } => {
                self.replace_keyword_at(*index, keyword.clone())
            }
            EditOp::RemoveKeyword { index } => self.remove_keyword_at(*index),
        }
    }
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(CurateError::Index { index, len });
    }
    Ok(())
}
