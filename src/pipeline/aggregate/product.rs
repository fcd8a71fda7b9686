use chrono::NaiveDate;

use super::digest::{leading_unique, summary_text};
use super::{group_by, AggregationReport};
use crate::db::{ReviewTable, SummaryTable};
use crate::models::{EnrichedReview, ProductSummary, SentimentCounts};
use crate::pipeline::error::PipelineError;
use crate::pipeline::scan::PaginatedScanner;

/// Writes one `ProductSummary` per product per run date.
pub struct ProductAggregator<'a> {
    reviews: &'a dyn ReviewTable,
    summaries: &'a dyn SummaryTable,
    page_size: usize,
    digest_size: usize,
}

impl<'a> ProductAggregator<'a> {
    pub fn new(
        reviews: &'a dyn ReviewTable,
        summaries: &'a dyn SummaryTable,
        page_size: usize,
        digest_size: usize,
    ) -> Self {
        Self {
            reviews,
            summaries,
            page_size,
            digest_size,
        }
    }

    pub fn run(&self, summary_date: NaiveDate) -> Result<AggregationReport, PipelineError> {
        let collected = PaginatedScanner::new(self.reviews, self.page_size).collect_reviews()?;
        let summaries = summarize_products(&collected.reviews, summary_date, self.digest_size);

        for summary in &summaries {
            self.summaries.put_product_summary(summary)?;
        }

        tracing::info!(
            reviews = collected.reviews.len(),
            skipped = collected.skipped,
            products = summaries.len(),
            date = %summary_date,
            "Product summaries written"
        );

        Ok(AggregationReport {
            reviews_scanned: collected.reviews.len(),
            records_skipped: collected.skipped,
            summaries_written: summaries.len(),
        })
    }
}

/// One summary per distinct non-empty `ProductID`, in first-seen order.
/// IDs are compared verbatim, whitespace included.
pub fn summarize_products(
    reviews: &[EnrichedReview],
    summary_date: NaiveDate,
    digest_size: usize,
) -> Vec<ProductSummary> {
    group_by(reviews, |r| {
        let product = &r.review.product_id;
        (!product.is_empty()).then(|| product.clone())
    })
    .into_iter()
    .map(|(product_id, group)| {
        let mut counts = SentimentCounts::default();
        let mut phrases = Vec::new();
        for review in &group {
            counts.record(review.sentiment);
            phrases.extend(review.key_phrases.iter().cloned());
        }

        ProductSummary {
            product_id,
            summary_date,
            summary_text: summary_text(&leading_unique(&phrases, digest_size)),
            sentiment_summary: counts.describe(),
            total_reviews: counts.total(),
        }
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::db::{SqliteReviewTable, SqliteSummaryTable};
    use crate::models::{RawReviewRow, Sentiment};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn review(id: &str, product: &str, sentiment: Sentiment, phrases: &[&str]) -> EnrichedReview {
        EnrichedReview {
            review: RawReviewRow {
                review_id: id.into(),
                product_id: product.into(),
                ..Default::default()
            },
            sentiment,
            key_phrases: phrases.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    fn summary_rows(conn: &Connection) -> Vec<(String, String, String, String, u32)> {
        let mut stmt = conn
            .prepare(
                "SELECT product_id, summary_date, summary_text, sentiment_summary, total_reviews
                 FROM product_review_summaries ORDER BY product_id",
            )
            .unwrap();
        stmt.query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
        })
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
    }

    #[test]
    fn groups_by_product_and_counts_sentiments() {
        let reviews = vec![
            review("R1", "P1", Sentiment::Positive, &["screen", "battery"]),
            review("R2", "P2", Sentiment::Negative, &["price"]),
            review("R3", "P1", Sentiment::Mixed, &["screen", "case"]),
        ];

        let summaries = summarize_products(&reviews, day(), 10);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].product_id, "P1");
        assert_eq!(summaries[0].total_reviews, 2);
        assert_eq!(summaries[0].summary_text, "Top phrases: screen, battery, case");
        assert_eq!(
            summaries[0].sentiment_summary,
            "Positive: 1, Negative: 0, Neutral: 0"
        );
        assert_eq!(summaries[1].summary_text, "Top phrases: price");
    }

    #[test]
    fn reviews_without_product_are_excluded() {
        let reviews = vec![
            review("R1", "", Sentiment::Positive, &["x"]),
            review("R2", "", Sentiment::Negative, &["y"]),
        ];
        assert!(summarize_products(&reviews, day(), 10).is_empty());
    }

    #[test]
    fn product_ids_are_grouped_verbatim() {
        let reviews = vec![
            review("R1", "P1", Sentiment::Positive, &["screen"]),
            review("R2", " P1", Sentiment::Negative, &["price"]),
            review("R3", "P1", Sentiment::Neutral, &["case"]),
        ];

        let summaries = summarize_products(&reviews, day(), 10);

        let keys: Vec<_> = summaries.iter().map(|s| (s.product_id.as_str(), s.total_reviews)).collect();
        assert_eq!(keys, vec![("P1", 2), (" P1", 1)]);
        assert_eq!(summaries[1].sentiment_summary, "Positive: 0, Negative: 1, Neutral: 0");
    }

    #[test]
    fn digest_slices_raw_phrases_before_dedupe() {
        let repeated: Vec<&str> = vec!["same"; 10];
        let reviews = vec![
            review("R1", "P1", Sentiment::Neutral, &repeated),
            review("R2", "P1", Sentiment::Neutral, &["late"]),
        ];

        let summaries = summarize_products(&reviews, day(), 10);

        assert_eq!(summaries[0].summary_text, "Top phrases: same");
    }

    #[test]
    fn same_day_rerun_is_idempotent() {
        let conn = open_memory_database().unwrap();
        let reviews = SqliteReviewTable::new(&conn);
        let summaries = SqliteSummaryTable::new(&conn);
        for r in [
            review("R1", "P1", Sentiment::Positive, &["screen"]),
            review("R2", "P2", Sentiment::Negative, &["price"]),
            review("R3", "P1", Sentiment::Positive, &["battery"]),
        ] {
            reviews.upsert_review(&r).unwrap();
        }
        let aggregator = ProductAggregator::new(&reviews, &summaries, 2, 10);

        let first = aggregator.run(day()).unwrap();
        let snapshot = summary_rows(&conn);
        let second = aggregator.run(day()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.summaries_written, 2);
        assert_eq!(summary_rows(&conn), snapshot);
        assert_eq!(snapshot[0].1, "2026-06-01");
    }

    #[test]
    fn empty_corpus_writes_nothing() {
        let conn = open_memory_database().unwrap();
        let reviews = SqliteReviewTable::new(&conn);
        let summaries = SqliteSummaryTable::new(&conn);

        let report = ProductAggregator::new(&reviews, &summaries, 10, 10)
            .run(day())
            .unwrap();

        assert_eq!(report, AggregationReport::default());
        assert!(summary_rows(&conn).is_empty());
    }
}
