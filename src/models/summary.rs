//! Daily summary records written by the aggregation stages.

use chrono::NaiveDate;
use serde::Serialize;

use super::review::Sentiment;

/// Per-product summary, keyed by `(ProductID, SummaryDate)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductSummary {
    #[serde(rename = "ProductID")]
    pub product_id: String,
    pub summary_date: NaiveDate,
    pub summary_text: String,
    pub sentiment_summary: String,
    pub total_reviews: u32,
}

/// Per-sentiment summary, keyed by `(Sentiment, SummaryDate)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SentimentSummary {
    pub sentiment: Sentiment,
    pub summary_date: NaiveDate,
    pub summary_text: String,
    pub total_reviews: u32,
}

/// Occurrence count of each sentiment label within a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentCounts {
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
    pub mixed: u32,
}

impl SentimentCounts {
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Mixed => self.mixed += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.positive + self.negative + self.neutral + self.mixed
    }

    /// Human-readable form stored in `SentimentSummary`. MIXED reviews count
    /// toward `total` but are not listed.
    pub fn describe(&self) -> String {
        format!(
            "Positive: {}, Negative: {}, Neutral: {}",
            self.positive, self.negative, self.neutral
        )
    }
}

/// Format a `SummaryDate` key.
pub fn summary_date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_lists_three_labels_and_total_counts_mixed() {
        let mut counts = SentimentCounts::default();
        counts.record(Sentiment::Positive);
        counts.record(Sentiment::Positive);
        counts.record(Sentiment::Mixed);

        assert_eq!(counts.total(), 3);
        assert_eq!(counts.describe(), "Positive: 2, Negative: 0, Neutral: 0");
    }

    #[test]
    fn summary_date_is_iso() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        assert_eq!(summary_date_key(date), "2026-03-04");
    }
}
