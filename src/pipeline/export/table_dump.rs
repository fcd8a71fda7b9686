use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::phrase_list::render_phrase_list;
use super::{finish_csv, ExportReport, CSV_CONTENT_TYPE, JSON_CONTENT_TYPE};
use crate::config::ArtifactKeys;
use crate::db::ReviewTable;
use crate::pipeline::error::PipelineError;
use crate::pipeline::scan::PaginatedScanner;
use crate::storage::BlobStore;

/// Dumps the whole review table to a JSON array and a flat CSV.
///
/// The CSV header is the sorted union of attribute names; list attributes are
/// written as list literals so later stages can parse them back.
pub struct TableExporter<'a> {
    reviews: &'a dyn ReviewTable,
    blobs: &'a dyn BlobStore,
    page_size: usize,
    json_key: &'a str,
    csv_key: &'a str,
}

impl<'a> TableExporter<'a> {
    pub fn new(
        reviews: &'a dyn ReviewTable,
        blobs: &'a dyn BlobStore,
        page_size: usize,
        artifacts: &'a ArtifactKeys,
    ) -> Self {
        Self {
            reviews,
            blobs,
            page_size,
            json_key: &artifacts.table_dump_json,
            csv_key: &artifacts.table_dump_csv,
        }
    }

    pub fn run(&self) -> Result<ExportReport, PipelineError> {
        let collected = PaginatedScanner::new(self.reviews, self.page_size).collect_reviews()?;
        let items: Vec<Map<String, Value>> = collected.reviews.iter().map(|r| r.to_item()).collect();

        let json = serde_json::to_vec(&items)?;
        self.blobs.put_object(self.json_key, &json, JSON_CONTENT_TYPE)?;

        let csv = render_items_csv(&items)?;
        self.blobs.put_object(self.csv_key, &csv, CSV_CONTENT_TYPE)?;

        let location = self.blobs.uri_for(self.csv_key);
        tracing::info!(
            items = items.len(),
            skipped = collected.skipped,
            json = %self.blobs.uri_for(self.json_key),
            csv = %location,
            "Review table exported"
        );

        Ok(ExportReport {
            rows_written: items.len(),
            location,
            manifest_location: None,
        })
    }
}

/// Flat CSV of `items` with the sorted union of their keys as header.
pub fn render_items_csv(items: &[Map<String, Value>]) -> Result<Vec<u8>, PipelineError> {
    let columns: BTreeSet<&str> = items
        .iter()
        .flat_map(|item| item.keys().map(String::as_str))
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&columns)?;
    for item in items {
        writer.write_record(columns.iter().map(|c| cell(item.get(*c))))?;
    }

    finish_csv(writer)
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(values)) => {
            let strings: Vec<String> = values
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            render_phrase_list(&strings)
        }
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::db::SqliteReviewTable;
    use crate::models::{EnrichedReview, RawReviewRow, Sentiment, SentimentScore};
    use crate::pipeline::export::{field, parse_phrase_list, DumpTable};
    use crate::storage::InMemoryBlobStore;

    fn review(id: &str, phrases: &[&str]) -> EnrichedReview {
        EnrichedReview {
            review: RawReviewRow {
                review_id: id.into(),
                product_id: "P1".into(),
                review_text: "Great, 'item'!".into(),
                ..Default::default()
            },
            sentiment: Sentiment::Positive,
            scores: SentimentScore {
                positive: 1.0,
                ..Default::default()
            },
            key_phrases: phrases.iter().map(|p| p.to_string()).collect(),
            entities: vec!["Kindle".into()],
        }
    }

    #[test]
    fn header_is_sorted_attribute_union() {
        let mut a = Map::new();
        a.insert("b".into(), Value::String("1".into()));
        let mut b = Map::new();
        b.insert("a".into(), Value::String("2".into()));

        let csv = String::from_utf8(render_items_csv(&[a, b]).unwrap()).unwrap();

        assert_eq!(csv, "a,b\n,1\n2,\n");
    }

    #[test]
    fn exports_json_and_parseable_csv() {
        let conn = open_memory_database().unwrap();
        let table = SqliteReviewTable::new(&conn);
        table.upsert_review(&review("R1", &["fast, cheap", "kid's tablet"])).unwrap();
        table.upsert_review(&review("R2", &[])).unwrap();
        let blobs = InMemoryBlobStore::new("customer-reviews");
        let artifacts = ArtifactKeys::default();

        let report = TableExporter::new(&table, &blobs, 1, &artifacts).run().unwrap();

        assert_eq!(report.rows_written, 2);
        assert_eq!(report.location, blobs.uri_for(&artifacts.table_dump_csv));

        let json: Vec<Value> =
            serde_json::from_slice(&blobs.get_object(&artifacts.table_dump_json).unwrap()).unwrap();
        assert_eq!(json.len(), 2);
        assert_eq!(json[0]["KeyPhrases"][1], "kid's tablet");

        let dump = DumpTable::parse(&blobs.get_object(&artifacts.table_dump_csv).unwrap()).unwrap();
        let phrases = dump.column("KeyPhrases");
        let first = &dump.records()[0];
        assert_eq!(
            parse_phrase_list(field(first, phrases)).unwrap(),
            vec!["fast, cheap", "kid's tablet"]
        );
        assert_eq!(field(&dump.records()[1], phrases), "[]");
        assert_eq!(
            field(first, dump.column("SentimentScore_Positive")),
            "1.0"
        );
        assert_eq!(field(first, dump.column("ReviewText")), "Great, 'item'!");
    }
}
