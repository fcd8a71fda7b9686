//! EnrichmentPipeline: raw review CSV → NLP enrichment → review table.
//!
//! Three batch NLP calls (sentiment, key phrases, entities) run over the same
//! ordered text list. Row `i` is merged with result `i` of each call and
//! upserted by `ReviewID`. The first failed call or upsert aborts the run;
//! records already upserted stay in place.

use std::time::Instant;

use csv::StringRecord;
use serde::Serialize;

use super::error::PipelineError;
use super::nlp::{normalize_text, BatchInvoker, NlpError, TextAnalyzer};
use crate::db::ReviewTable;
use crate::models::{EnrichedReview, RawReviewRow};
use crate::storage::BlobStore;

/// Counts from one enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentReport {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub records_upserted: usize,
}

/// Rows parsed from an input CSV, malformed rows already dropped.
#[derive(Debug, Default)]
pub struct RawRows {
    pub rows: Vec<RawReviewRow>,
    pub skipped: usize,
}

/// Parse the raw review CSV. Rows that fail to decode or carry no
/// `ReviewID` are logged and dropped. Unknown columns are ignored. Short
/// rows are padded with empty fields and long rows cut to the header width.
pub fn read_raw_rows(data: &[u8]) -> Result<RawRows, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);
    // Force header parsing so a broken header fails the run instead of every row.
    let headers = reader.headers()?.clone();

    let mut parsed = RawRows::default();
    for (line, result) in reader.records().enumerate() {
        let decoded = result.and_then(|record| {
            fit_to_width(record, headers.len()).deserialize::<RawReviewRow>(Some(&headers))
        });
        match decoded {
            Ok(row) if !row.review_id.trim().is_empty() => parsed.rows.push(row),
            Ok(_) => {
                tracing::warn!(row = line + 1, "Skipping review row without ReviewID");
                parsed.skipped += 1;
            }
            Err(e) => {
                tracing::warn!(row = line + 1, error = %e, "Skipping undecodable review row");
                parsed.skipped += 1;
            }
        }
    }

    Ok(parsed)
}

fn fit_to_width(mut record: StringRecord, width: usize) -> StringRecord {
    record.truncate(width);
    while record.len() < width {
        record.push_field("");
    }
    record
}

pub struct EnrichmentPipeline<'a> {
    analyzer: &'a dyn TextAnalyzer,
    reviews: &'a dyn ReviewTable,
    invoker: BatchInvoker,
}

impl<'a> EnrichmentPipeline<'a> {
    pub fn new(
        analyzer: &'a dyn TextAnalyzer,
        reviews: &'a dyn ReviewTable,
        invoker: BatchInvoker,
    ) -> Self {
        Self {
            analyzer,
            reviews,
            invoker,
        }
    }

    /// Read the raw CSV at `key` and enrich every well-formed row.
    pub fn run_from_blob(
        &self,
        blobs: &dyn BlobStore,
        key: &str,
    ) -> Result<EnrichmentReport, PipelineError> {
        let start = Instant::now();
        let data = blobs.get_object(key)?;
        let parsed = read_raw_rows(&data)?;

        tracing::info!(
            key,
            rows = parsed.rows.len(),
            skipped = parsed.skipped,
            "Read raw review rows"
        );

        let rows_read = parsed.rows.len() + parsed.skipped;
        let report = EnrichmentReport {
            rows_read,
            rows_skipped: parsed.skipped,
            records_upserted: self.enrich(parsed.rows)?,
        };
        tracing::info!(
            upserted = report.records_upserted,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Enrichment complete"
        );
        Ok(report)
    }

    /// Enrich and upsert `rows` in order. Returns the number of upserts.
    pub fn enrich(&self, rows: Vec<RawReviewRow>) -> Result<usize, PipelineError> {
        let texts: Vec<String> = rows
            .iter()
            .map(|row| normalize_text(&row.review_text).to_string())
            .collect();

        let sentiments = self.invoker.sentiment(self.analyzer, &texts)?;
        let key_phrases = self.invoker.key_phrases(self.analyzer, &texts)?;
        let entities = self.invoker.entities(self.analyzer, &texts)?;

        for (operation, len) in [
            ("sentiment", sentiments.len()),
            ("key_phrases", key_phrases.len()),
            ("entities", entities.len()),
        ] {
            if len != rows.len() {
                return Err(NlpError::Misaligned {
                    operation,
                    chunk: 0,
                    details: format!("{len} results for {} texts", rows.len()),
                }
                .into());
            }
        }

        let mut upserted = 0;
        let merged = rows
            .into_iter()
            .zip(texts)
            .zip(sentiments)
            .zip(key_phrases.into_iter().zip(entities));

        for (((mut row, text), detection), (phrases, entities)) in merged {
            row.review_text = text;
            let review = EnrichedReview {
                review: row,
                sentiment: detection.sentiment,
                scores: detection.scores,
                key_phrases: phrases,
                entities,
            };
            self.reviews.upsert_review(&review)?;
            upserted += 1;
        }

        Ok(upserted)
    }
}
