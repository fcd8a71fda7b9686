use csv::QuoteStyle;

use super::sanitize::{clean_text, is_sanitized, EXPORT_COLUMNS};
use super::{field, finish_csv, publish_with_manifest, DumpTable, ExportReport};
use crate::config::ArtifactKeys;
use crate::pipeline::error::PipelineError;
use crate::storage::BlobStore;

/// Builds the cleaned, column-whitelisted CSV the BI tool imports.
pub struct ExportRenderer<'a> {
    blobs: &'a dyn BlobStore,
    artifacts: &'a ArtifactKeys,
}

impl<'a> ExportRenderer<'a> {
    pub fn new(blobs: &'a dyn BlobStore, artifacts: &'a ArtifactKeys) -> Self {
        Self { blobs, artifacts }
    }

    pub fn run(&self) -> Result<ExportReport, PipelineError> {
        let source = self.blobs.get_object(&self.artifacts.table_dump_csv)?;
        let (body, rows_written) = render_cleaned_csv(&source)?;

        let (location, manifest_location) = publish_with_manifest(
            self.blobs,
            &self.artifacts.cleaned_csv,
            &self.artifacts.cleaned_manifest,
            &body,
        )?;

        tracing::info!(rows = rows_written, location = %location, "Cleaned CSV written");

        Ok(ExportReport {
            rows_written,
            location,
            manifest_location: Some(manifest_location),
        })
    }
}

/// Project the table dump onto `EXPORT_COLUMNS` and sanitize free text.
/// Every field is quoted. Returns the CSV bytes and the data row count.
pub fn render_cleaned_csv(source: &[u8]) -> Result<(Vec<u8>, usize), PipelineError> {
    let table = DumpTable::parse(source)?;
    let columns: Vec<(&str, Option<usize>)> = EXPORT_COLUMNS
        .iter()
        .map(|name| (*name, table.column(name)))
        .collect();

    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());
    writer.write_record(EXPORT_COLUMNS)?;

    for record in table.records() {
        let row = columns.iter().map(|&(name, idx)| {
            let value = field(record, idx);
            if is_sanitized(name) {
                clean_text(value)
            } else {
                value.to_string()
            }
        });
        writer.write_record(row)?;
    }

    Ok((finish_csv(writer)?, table.records().len()))
}
