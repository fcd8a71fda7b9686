//! Table-store seams used by the pipeline stages.
//!
//! The review table is an upsert-by-key store that can only be read through
//! paged scans; the summary table is write-only from the pipeline's side.

use crate::models::{EnrichedReview, ProductSummary, SentimentSummary, StoredReview};

use super::DatabaseError;

/// Opaque continuation marker returned with a non-final page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Attribute a scan can be filtered on (equality only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAttribute {
    ProductId,
    Sentiment,
}

impl FilterAttribute {
    pub fn column(&self) -> &'static str {
        match self {
            Self::ProductId => "product_id",
            Self::Sentiment => "sentiment",
        }
    }
}

/// Push-down filter evaluated by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFilter {
    pub attribute: FilterAttribute,
    pub value: String,
}

impl ScanFilter {
    pub fn equals(attribute: FilterAttribute, value: impl Into<String>) -> Self {
        Self {
            attribute,
            value: value.into(),
        }
    }
}

/// One page request.
#[derive(Debug, Clone)]
pub struct ScanRequest<'a> {
    pub filter: Option<&'a ScanFilter>,
    pub start_after: Option<&'a PageCursor>,
    pub limit: usize,
}

/// One page response. `next` is `None` exactly on the last page.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub items: Vec<StoredReview>,
    pub next: Option<PageCursor>,
}

/// Durable store of enriched reviews, keyed by `ReviewID`.
pub trait ReviewTable {
    /// Insert or overwrite the record with the same `ReviewID`.
    fn upsert_review(&self, review: &EnrichedReview) -> Result<(), DatabaseError>;

    /// Fetch one page of records.
    fn scan_page(&self, request: &ScanRequest<'_>) -> Result<ScanPage, DatabaseError>;
}

/// Durable store of daily summaries.
pub trait SummaryTable {
    /// Insert or overwrite the summary for `(ProductID, SummaryDate)`.
    fn put_product_summary(&self, summary: &ProductSummary) -> Result<(), DatabaseError>;

    /// Insert or overwrite the summary for `(Sentiment, SummaryDate)`.
    fn put_sentiment_summary(&self, summary: &SentimentSummary) -> Result<(), DatabaseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traits_are_object_safe() {
        fn _assert_reviews(_: &dyn ReviewTable) {}
        fn _assert_summaries(_: &dyn SummaryTable) {}
    }

    #[test]
    fn filter_columns_are_fixed() {
        assert_eq!(FilterAttribute::ProductId.column(), "product_id");
        assert_eq!(FilterAttribute::Sentiment.column(), "sentiment");
    }
}
