//! BatchInvoker: chunked NLP calls with order-preserving reassembly.
//!
//! Texts are split into contiguous chunks of at most `chunk_size`, one service
//! call per chunk, issued sequentially. Each chunk's results are re-sorted by
//! their in-chunk index before concatenation, so output position `i` always
//! belongs to input text `i`. Any failing chunk fails the whole call.

use super::{Indexed, NlpError, SentimentDetection, TextAnalyzer};

/// Stand-in for empty or blank texts; the service rejects empty strings.
pub const PLACEHOLDER_TEXT: &str = " ";

/// Text as it is submitted to the NLP service.
pub fn normalize_text(text: &str) -> &str {
    if text.trim().is_empty() {
        PLACEHOLDER_TEXT
    } else {
        text
    }
}

pub struct BatchInvoker {
    chunk_size: usize,
    language: String,
}

impl BatchInvoker {
    pub fn new(chunk_size: usize, language: &str) -> Result<Self, NlpError> {
        if chunk_size == 0 {
            return Err(NlpError::InvalidChunkSize);
        }
        Ok(Self {
            chunk_size,
            language: language.to_string(),
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn sentiment(
        &self,
        analyzer: &dyn TextAnalyzer,
        texts: &[String],
    ) -> Result<Vec<SentimentDetection>, NlpError> {
        self.invoke("sentiment", texts, |chunk| {
            analyzer.detect_sentiment(chunk, &self.language)
        })
    }

    pub fn key_phrases(
        &self,
        analyzer: &dyn TextAnalyzer,
        texts: &[String],
    ) -> Result<Vec<Vec<String>>, NlpError> {
        self.invoke("key_phrases", texts, |chunk| {
            analyzer.detect_key_phrases(chunk, &self.language)
        })
    }

    pub fn entities(
        &self,
        analyzer: &dyn TextAnalyzer,
        texts: &[String],
    ) -> Result<Vec<Vec<String>>, NlpError> {
        self.invoke("entities", texts, |chunk| {
            analyzer.detect_entities(chunk, &self.language)
        })
    }

    /// Run `call` once per chunk and return one result per input text,
    /// in input order.
    pub fn invoke<T, F>(
        &self,
        operation: &'static str,
        texts: &[String],
        mut call: F,
    ) -> Result<Vec<T>, NlpError>
    where
        F: FnMut(&[String]) -> Result<Vec<Indexed<T>>, NlpError>,
    {
        let prepared: Vec<String> = texts
            .iter()
            .map(|t| normalize_text(t).to_string())
            .collect();

        let mut results = Vec::with_capacity(prepared.len());
        for (chunk_no, chunk) in prepared.chunks(self.chunk_size).enumerate() {
            let raw = call(chunk)?;
            let aligned = align_chunk(operation, chunk_no, chunk.len(), raw)?;
            tracing::debug!(operation, chunk = chunk_no, size = chunk.len(), "NLP chunk complete");
            results.extend(aligned);
        }

        Ok(results)
    }
}

/// Order one chunk's results by index, requiring each index in
/// `0..expected` exactly once.
fn align_chunk<T>(
    operation: &'static str,
    chunk: usize,
    expected: usize,
    results: Vec<Indexed<T>>,
) -> Result<Vec<T>, NlpError> {
    let misaligned = |details: String| NlpError::Misaligned {
        operation,
        chunk,
        details,
    };

    let mut slots: Vec<Option<T>> = (0..expected).map(|_| None).collect();
    for item in results {
        let slot = slots
            .get_mut(item.index)
            .ok_or_else(|| misaligned(format!("index {} outside chunk of {expected}", item.index)))?;
        if slot.is_some() {
            return Err(misaligned(format!("duplicate result for index {}", item.index)));
        }
        *slot = Some(item.value);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(idx, slot)| slot.ok_or_else(|| misaligned(format!("missing result for index {idx}"))))
        .collect()
}
