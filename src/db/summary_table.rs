use rusqlite::{params, Connection};

use super::tables::SummaryTable;
use super::DatabaseError;
use crate::models::{summary_date_key, ProductSummary, SentimentSummary};

/// SQLite-backed summary tables. Same-day writes replace the previous row.
pub struct SqliteSummaryTable<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteSummaryTable<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl SummaryTable for SqliteSummaryTable<'_> {
    fn put_product_summary(&self, summary: &ProductSummary) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO product_review_summaries
             (product_id, summary_date, summary_text, sentiment_summary, total_reviews)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                summary.product_id,
                summary_date_key(summary.summary_date),
                summary.summary_text,
                summary.sentiment_summary,
                summary.total_reviews,
            ],
        )?;
        Ok(())
    }

    fn put_sentiment_summary(&self, summary: &SentimentSummary) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO sentiment_review_summaries
             (sentiment, summary_date, summary_text, total_reviews)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                summary.sentiment.as_str(),
                summary_date_key(summary.summary_date),
                summary.summary_text,
                summary.total_reviews,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::Sentiment;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    fn product_summary(date: NaiveDate, text: &str) -> ProductSummary {
        ProductSummary {
            product_id: "P1".into(),
            summary_date: date,
            summary_text: text.into(),
            sentiment_summary: "Positive: 1, Negative: 0, Neutral: 0".into(),
            total_reviews: 1,
        }
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn same_day_product_summary_overwrites() {
        let conn = open_memory_database().unwrap();
        let table = SqliteSummaryTable::new(&conn);

        table.put_product_summary(&product_summary(day(1), "Top phrases: a")).unwrap();
        table.put_product_summary(&product_summary(day(1), "Top phrases: b")).unwrap();

        assert_eq!(count(&conn, "product_review_summaries"), 1);
        let text: String = conn
            .query_row("SELECT summary_text FROM product_review_summaries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(text, "Top phrases: b");
    }

    #[test]
    fn different_days_keep_separate_rows() {
        let conn = open_memory_database().unwrap();
        let table = SqliteSummaryTable::new(&conn);

        table.put_product_summary(&product_summary(day(1), "x")).unwrap();
        table.put_product_summary(&product_summary(day(2), "x")).unwrap();

        assert_eq!(count(&conn, "product_review_summaries"), 2);
    }

    #[test]
    fn sentiment_summary_keyed_by_label_and_date() {
        let conn = open_memory_database().unwrap();
        let table = SqliteSummaryTable::new(&conn);

        for sentiment in [Sentiment::Positive, Sentiment::Positive, Sentiment::Mixed] {
            table
                .put_sentiment_summary(&SentimentSummary {
                    sentiment,
                    summary_date: day(3),
                    summary_text: "Top phrases: ".into(),
                    total_reviews: 2,
                })
                .unwrap();
        }

        assert_eq!(count(&conn, "sentiment_review_summaries"), 2);
        let stored: String = conn
            .query_row(
                "SELECT summary_date FROM sentiment_review_summaries WHERE sentiment = 'MIXED'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(stored, "2026-05-03");
    }
}
