//! Run-level error: anything that aborts a stage.
//!
//! Malformed individual records never surface here; stages log and skip them.

use thiserror::Error;

use super::nlp::NlpError;
use crate::db::DatabaseError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("NLP error: {0}")]
    Nlp(#[from] NlpError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
