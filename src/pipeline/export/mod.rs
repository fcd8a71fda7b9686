//! Export stages: table dump, cleaned BI CSV, exploded key phrases.
//!
//! `TableExporter` writes the full review table as JSON and CSV. The other two
//! stages read that CSV back and derive BI-ready artifacts, each with a
//! manifest telling the BI tool where the artifact lives and how to parse it.

pub mod cleaned;
pub mod key_phrases;
pub mod phrase_list;
pub mod sanitize;
pub mod table_dump;

pub use cleaned::{render_cleaned_csv, ExportRenderer};
pub use key_phrases::{atomic_fragments, explode_record, KeyPhraseExploder};
pub use phrase_list::{parse_phrase_list, render_phrase_list, PhraseListError};
pub use sanitize::{clean_text, EXPORT_COLUMNS, SANITIZED_COLUMNS};
pub use table_dump::TableExporter;

use csv::StringRecord;
use serde::Serialize;

use super::error::PipelineError;
use crate::models::ExportManifest;
use crate::storage::BlobStore;

pub(crate) const CSV_CONTENT_TYPE: &str = "text/csv";
pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";

/// Result of one export stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub rows_written: usize,
    pub location: String,
    pub manifest_location: Option<String>,
}

/// Table-dump CSV held in memory, addressed by column name.
pub(crate) struct DumpTable {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl DumpTable {
    pub(crate) fn parse(data: &[u8]) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);
        let headers = reader.headers()?.clone();
        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self { headers, records })
    }

    pub(crate) fn records(&self) -> &[StringRecord] {
        &self.records
    }

    pub(crate) fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Field at `column` of `record`, empty when the column or field is absent.
pub(crate) fn field(record: &StringRecord, column: Option<usize>) -> &str {
    column.and_then(|idx| record.get(idx)).unwrap_or("")
}

/// Finish an in-memory CSV writer into its bytes.
pub(crate) fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, PipelineError> {
    writer
        .into_inner()
        .map_err(|e| PipelineError::Io(e.into_error()))
}

/// Store a CSV artifact and its manifest. Returns `(csv uri, manifest uri)`.
pub(crate) fn publish_with_manifest(
    blobs: &dyn BlobStore,
    csv_key: &str,
    manifest_key: &str,
    body: &[u8],
) -> Result<(String, String), PipelineError> {
    blobs.put_object(csv_key, body, CSV_CONTENT_TYPE)?;

    let location = blobs.uri_for(csv_key);
    let manifest = serde_json::to_vec_pretty(&ExportManifest::for_csv(location.clone()))?;
    blobs.put_object(manifest_key, &manifest, JSON_CONTENT_TYPE)?;

    Ok((location, blobs.uri_for(manifest_key)))
}
