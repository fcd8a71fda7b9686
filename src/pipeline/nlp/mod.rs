//! Text-analysis seam: sentiment, key phrases and entities for a batch of texts.
//!
//! The service is treated as a pure function. Each result carries the index of
//! its text within the submitted batch; `BatchInvoker` relies on that index,
//! not on response order, to keep results aligned with their inputs.

pub mod batch;
pub mod http;
#[cfg(test)]
pub mod mock;

pub use batch::{normalize_text, BatchInvoker, PLACEHOLDER_TEXT};
pub use http::HttpTextAnalyzer;

use thiserror::Error;

use crate::models::{Sentiment, SentimentScore};

#[derive(Error, Debug)]
pub enum NlpError {
    #[error("NLP service is not reachable at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("NLP service returned error (status {status}): {body}")]
    Service { status: u16, body: String },

    #[error("NLP service rejected {count} item(s), first at index {index}: {message}")]
    ItemErrors {
        count: usize,
        index: usize,
        message: String,
    },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("{operation} chunk {chunk} results misaligned: {details}")]
    Misaligned {
        operation: &'static str,
        chunk: usize,
        details: String,
    },

    #[error("Chunk size must be at least 1")]
    InvalidChunkSize,
}

/// A per-text result tagged with its position inside the submitted batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Indexed<T> {
    pub index: usize,
    pub value: T,
}

impl<T> Indexed<T> {
    pub fn new(index: usize, value: T) -> Self {
        Self { index, value }
    }
}

/// Sentiment result for one text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentDetection {
    pub sentiment: Sentiment,
    pub scores: SentimentScore,
}

/// External NLP capability. One call handles one batch (at most the
/// service's batch limit); results may come back in any order.
pub trait TextAnalyzer {
    fn detect_sentiment(
        &self,
        texts: &[String],
        language: &str,
    ) -> Result<Vec<Indexed<SentimentDetection>>, NlpError>;

    fn detect_key_phrases(
        &self,
        texts: &[String],
        language: &str,
    ) -> Result<Vec<Indexed<Vec<String>>>, NlpError>;

    fn detect_entities(
        &self,
        texts: &[String],
        language: &str,
    ) -> Result<Vec<Indexed<Vec<String>>>, NlpError>;
}
