use thiserror::Error;

use crate::qrels::QueryId;

/// Main error type for rankeval
#[derive(Error, Debug)]
pub enum EvalError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Run file (JSON) errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed judgments source
    #[error("Parse error: {0}")]
    Parse(String),

    /// No judgment row carries the primary relevance tier for this query
    #[error("No primary relevant document for query {query_id}")]
    MissingPrimary { query_id: QueryId },

    /// Prediction list is shorter than the requested cutoff
    #[error("k is greater than number of predicted ids (query {query_id}: k={k}, got {len})")]
    InsufficientPredictions { query_id: QueryId, k: usize, len: usize },

    /// query_ids and predictions are not index-aligned
    #[error("Got {queries} query ids but {predictions} prediction lists")]
    LengthMismatch { queries: usize, predictions: usize },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using EvalError
pub type Result<T> = std::result::Result<T, EvalError>;
