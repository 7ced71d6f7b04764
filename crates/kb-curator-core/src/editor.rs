//! Staging of manual overrides.
//!
//! A [`WorkingOverride`] is an explicit, caller-owned working copy of one
//! document's override. Nothing here touches the store: edits are applied to
//! the copy, [`WorkingOverride::validate`] gates the save, and
//! [`WorkingOverride::commit`] turns a valid copy into a [`PersistRequest`].
//!
//! ```text
//! NoOverride ──begin──▶ Staging ──validate──▶ Valid ──commit/save──▶ HasOverride
//!                          ▲                    │
//!                          └──── Invalid ◀──────┘
//! ```

use crate::edit::EditOp;
use crate::error::{CurateError, Result};
use crate::models::{AnswerSet, Document};

/// Outcome of validating a staged answer set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    /// Keyword positions whose text contains whitespace, ascending.
    Invalid { offending_indices: Vec<usize> },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }
}

/// Checks every keyword against the no-whitespace rule.
///
/// Texts carry no constraints. An answer set without keywords is valid.
pub fn validate(content: &AnswerSet) -> Validation {
    let offending_indices: Vec<usize> = content
        .keywords
        .iter()
        .enumerate()
        .filter(|(_, k)| k.has_whitespace())
        .map(|(i, _)| i)
        .collect();
    if offending_indices.is_empty() {
        Validation::Valid
    } else {
        Validation::Invalid { offending_indices }
    }
}

/// A validated override ready to be written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistRequest {
    pub id: String,
    pub content: AnswerSet,
}

/// Working copy of one document's override.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingOverride {
    document_id: String,
    had_override: bool,
    content: AnswerSet,
}

impl WorkingOverride {
    /// Seeds a working copy from the document's effective content.
    ///
    /// For a document without an override this is a copy of the automatic
    /// content; the document itself is left untouched.
    pub fn begin(doc: &Document) -> Self {
        Self {
            document_id: doc.id.clone(),
            had_override: doc.has_override(),
            content: doc.effective().clone(),
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Whether the document already had an override when staging began.
    pub fn had_override(&self) -> bool {
        self.had_override
    }

    pub fn content(&self) -> &AnswerSet {
        &self.content
    }

    /// Returns a copy with one edit applied. `self` is unchanged either way.
    pub fn apply(&self, op: &EditOp) -> Result<Self> {
        Ok(Self {
            document_id: self.document_id.clone(),
            had_override: self.had_override,
            content: self.content.apply(op)?,
        })
    }

    /// Applies edits in order, stopping at the first failure.
    pub fn apply_all<'a>(&self, ops: impl IntoIterator<Item = &'a EditOp>) -> Result<Self> {
        ops.into_iter()
            .try_fold(self.clone(), |working, op| working.apply(op))
    }

    pub fn validate(&self) -> Validation {
        validate(&self.content)
    }

    /// Produces the request to persist this override.
    ///
    /// Re-validates and fails with [`CurateError::Validation`] if any keyword
    /// is invalid, so a misused commit can never reach the store.
    pub fn commit(self) -> Result<PersistRequest> {
        if let Validation::Invalid { offending_indices } = self.validate() {
            return Err(CurateError::Validation { offending_indices });
        }
        Ok(PersistRequest {
            id: self.document_id,
            content: self.content,
        })
    }
}
