//! SQLite-backed review table with keyset pagination on `review_id`.

use rusqlite::{params, Connection, Row};

use super::tables::{PageCursor, ReviewTable, ScanPage, ScanRequest};
use super::DatabaseError;
use crate::models::{format_score, EnrichedReview, StoredReview};

const SELECT_COLUMNS: &str = "review_id, product_id, reviewer_name, helpful, review_text, rating,
        summary, review_time, unix_review_time, day_diff, helpful_yes, total_vote,
        sentiment, sentiment_score_positive, sentiment_score_negative,
        sentiment_score_neutral, sentiment_score_mixed, key_phrases, entities";

/// Review table stored in the `customer_reviews_analysis` SQLite table.
pub struct SqliteReviewTable<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteReviewTable<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Number of stored reviews.
    pub fn count(&self) -> Result<u64, DatabaseError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM customer_reviews_analysis",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

impl ReviewTable for SqliteReviewTable<'_> {
    fn upsert_review(&self, review: &EnrichedReview) -> Result<(), DatabaseError> {
        let key_phrases = to_json_list("KeyPhrases", &review.key_phrases)?;
        let entities = to_json_list("Entities", &review.entities)?;
        let r = &review.review;

        self.conn.execute(
            "INSERT OR REPLACE INTO customer_reviews_analysis
             (review_id, product_id, reviewer_name, helpful, review_text, rating,
              summary, review_time, unix_review_time, day_diff, helpful_yes, total_vote,
              sentiment, sentiment_score_positive, sentiment_score_negative,
              sentiment_score_neutral, sentiment_score_mixed, key_phrases, entities)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
            params![
                r.review_id,
                r.product_id,
                r.reviewer_name,
                r.helpful,
                r.review_text,
                r.rating,
                r.summary,
                r.review_time,
                r.unix_review_time,
                r.day_diff,
                r.helpful_yes,
                r.total_vote,
                review.sentiment.as_str(),
                format_score(review.scores.positive),
                format_score(review.scores.negative),
                format_score(review.scores.neutral),
                format_score(review.scores.mixed),
                key_phrases,
                entities,
            ],
        )?;

        Ok(())
    }

    fn scan_page(&self, request: &ScanRequest<'_>) -> Result<ScanPage, DatabaseError> {
        let start_after = request.start_after.map(PageCursor::as_str);
        let limit = request.limit as i64;

        let items = match request.filter {
            Some(filter) => {
                let sql = format!(
                    "SELECT {SELECT_COLUMNS} FROM customer_reviews_analysis
                     WHERE (?1 IS NULL OR review_id > ?1) AND {} = ?3
                     ORDER BY review_id LIMIT ?2",
                    filter.attribute.column()
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(params![start_after, limit, filter.value], stored_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!(
                    "SELECT {SELECT_COLUMNS} FROM customer_reviews_analysis
                     WHERE (?1 IS NULL OR review_id > ?1)
                     ORDER BY review_id LIMIT ?2"
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(params![start_after, limit], stored_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        // A full page may have more behind it; a short page is the last one.
        let next = if items.len() == request.limit {
            items
                .last()
                .and_then(|item: &StoredReview| item.review_id.clone())
                .map(PageCursor::new)
        } else {
            None
        };

        Ok(ScanPage { items, next })
    }
}

fn to_json_list(field: &'static str, values: &[String]) -> Result<String, DatabaseError> {
    serde_json::to_string(values).map_err(|e| DatabaseError::Serialization {
        field,
        reason: e.to_string(),
    })
}

fn stored_from_row(row: &Row<'_>) -> rusqlite::Result<StoredReview> {
    Ok(StoredReview {
        review_id: row.get(0)?,
        product_id: row.get(1)?,
        reviewer_name: row.get(2)?,
        helpful: row.get(3)?,
        review_text: row.get(4)?,
        rating: row.get(5)?,
        summary: row.get(6)?,
        review_time: row.get(7)?,
        unix_review_time: row.get(8)?,
        day_diff: row.get(9)?,
        helpful_yes: row.get(10)?,
        total_vote: row.get(11)?,
        sentiment: row.get(12)?,
        score_positive: row.get(13)?,
        score_negative: row.get(14)?,
        score_neutral: row.get(15)?,
        score_mixed: row.get(16)?,
        key_phrases: row.get(17)?,
        entities: row.get(18)?,
    })
}
