use csv::QuoteStyle;

use super::phrase_list::parse_phrase_list;
use super::{field, finish_csv, publish_with_manifest, DumpTable, ExportReport};
use crate::config::ArtifactKeys;
use crate::models::ExplodedPhraseRow;
use crate::pipeline::error::PipelineError;
use crate::storage::BlobStore;

/// Fans each review's key-phrase list out into one row per atomic phrase.
pub struct KeyPhraseExploder<'a> {
    blobs: &'a dyn BlobStore,
    artifacts: &'a ArtifactKeys,
}

impl<'a> KeyPhraseExploder<'a> {
    pub fn new(blobs: &'a dyn BlobStore, artifacts: &'a ArtifactKeys) -> Self {
        Self { blobs, artifacts }
    }

    pub fn run(&self) -> Result<ExportReport, PipelineError> {
        let source = self.blobs.get_object(&self.artifacts.table_dump_csv)?;
        let table = DumpTable::parse(&source)?;
        let id_col = table.column("ReviewID");
        let sentiment_col = table.column("Sentiment");
        let phrases_col = table.column("KeyPhrases");

        // Header written explicitly so an export with no rows still has one.
        let mut writer = csv::WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(["ReviewID", "Sentiment", "KeyPhrases"])?;

        let mut rows_written = 0;
        for record in table.records() {
            let rows = explode_record(
                field(record, id_col),
                field(record, sentiment_col),
                field(record, phrases_col),
            );
            for row in &rows {
                writer.serialize(row)?;
            }
            rows_written += rows.len();
        }

        let (location, manifest_location) = publish_with_manifest(
            self.blobs,
            &self.artifacts.key_phrases_csv,
            &self.artifacts.key_phrases_manifest,
            &finish_csv(writer)?,
        )?;

        tracing::info!(rows = rows_written, location = %location, "Key phrase CSV written");

        Ok(ExportReport {
            rows_written,
            location,
            manifest_location: Some(manifest_location),
        })
    }
}

/// Rows for one record. Empty when the phrase list or sentiment is missing
/// or the list cannot be parsed.
pub fn explode_record(review_id: &str, sentiment: &str, key_phrases: &str) -> Vec<ExplodedPhraseRow> {
    if key_phrases.is_empty() || sentiment.is_empty() {
        return Vec::new();
    }

    let phrases = match parse_phrase_list(key_phrases) {
        Ok(phrases) => phrases,
        Err(e) => {
            tracing::warn!(review_id, error = %e, "Skipping unparsable key phrase list");
            return Vec::new();
        }
    };

    phrases
        .iter()
        .flat_map(|phrase| atomic_fragments(phrase))
        .map(|key_phrase| ExplodedPhraseRow {
            review_id: review_id.to_string(),
            sentiment: sentiment.to_string(),
            key_phrase,
        })
        .collect()
}

/// Split on commas, then trim, lowercase and drop apostrophes; empty
/// fragments are discarded.
pub fn atomic_fragments(phrase: &str) -> Vec<String> {
    phrase
        .split(',')
        .map(|part| part.trim().to_lowercase().replace('\'', ""))
        .filter(|part| !part.is_empty())
        .collect()
}
