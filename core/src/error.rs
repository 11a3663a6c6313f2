use thiserror::Error;

use crate::DocId;

/// Errors raised while building or querying an index.
#[derive(Error, Debug)]
pub enum Error {
    #[error("sieve capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),

    #[error("match threshold must be in (0, 1], got {0}")]
    InvalidMatchThreshold(f64),

    #[error("posting for document {got} appended after document {last}")]
    NonMonotonicPosting { last: DocId, got: DocId },

    #[error("posting list is already finalized")]
    PostingListFinalized,

    #[error("expected document id {expected}, got {got}")]
    DocumentIdMismatch { expected: DocId, got: DocId },

    #[error("unsupported corpus format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
