use chrono::NaiveDate;

use super::digest::{summary_text, top_by_frequency};
use super::{group_by, review_count, AggregationReport};
use crate::db::{ReviewTable, SummaryTable};
use crate::models::{EnrichedReview, SentimentSummary};
use crate::pipeline::error::PipelineError;
use crate::pipeline::scan::PaginatedScanner;

/// Writes one `SentimentSummary` per sentiment label per run date.
pub struct SentimentAggregator<'a> {
    reviews: &'a dyn ReviewTable,
    summaries: &'a dyn SummaryTable,
    page_size: usize,
    digest_size: usize,
}

impl<'a> SentimentAggregator<'a> {
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
        if collected.reviews.is_empty() {
            tracing::info!(skipped = collected.skipped, "No reviews to summarize by sentiment");
            return Ok(AggregationReport {
                records_skipped: collected.skipped,
                ..Default::default()
            });
        }

        let summaries = summarize_sentiments(&collected.reviews, summary_date, self.digest_size);
        for summary in &summaries {
            self.summaries.put_sentiment_summary(summary)?;
        }

        tracing::info!(
            reviews = collected.reviews.len(),
            skipped = collected.skipped,
            labels = summaries.len(),
            date = %summary_date,
            "Sentiment summaries written"
        );

        Ok(AggregationReport {
            reviews_scanned: collected.reviews.len(),
            records_skipped: collected.skipped,
            summaries_written: summaries.len(),
        })
    }
}

/// One summary per sentiment label present, in first-seen order.
pub fn summarize_sentiments(
    reviews: &[EnrichedReview],
    summary_date: NaiveDate,
    digest_size: usize,
) -> Vec<SentimentSummary> {
    group_by(reviews, |r| Some(r.sentiment))
        .into_iter()
        .map(|(sentiment, group)| {
            let phrases: Vec<String> = group
                .iter()
                .flat_map(|r| r.key_phrases.iter().cloned())
                .collect();

            SentimentSummary {
                sentiment,
                summary_date,
                summary_text: summary_text(&top_by_frequency(&phrases, digest_size)),
                total_reviews: review_count(group.len()),
            }
        })
        .collect()
}
