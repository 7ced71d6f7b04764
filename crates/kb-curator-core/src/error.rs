use thiserror::Error;

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, CurateError>;

#[derive(Debug, Error)]
pub enum CurateError {
    /// One or more staged keywords contain whitespace. Raised before any
    /// store call is made.
    #[error("keywords must not contain whitespace (offending indices: {offending_indices:?})")]
    Validation { offending_indices: Vec<usize> },

    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },

    #[error("failed to fetch from store: {0}")]
    Fetch(#[source] StoreError),

    #[error("failed to persist to store: {0}")]
    Persist(#[source] StoreError),

    /// An edit addressed a position outside the sequence. Indicates a bug in
    /// the caller, not a recoverable condition.
    #[error("index {index} out of range for length {len}")]
    Index { index: usize, len: usize },
}

impl CurateError {
    pub(crate) fn not_found(what: &'static str, key: &str) -> Self {
        Self::NotFound {
            what,
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
