pub mod review_table;
pub mod sqlite;
pub mod summary_table;
pub mod tables;

pub use review_table::SqliteReviewTable;
pub use sqlite::*;
pub use summary_table::SqliteSummaryTable;
pub use tables::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Cannot serialize {field}: {reason}")]
    Serialization { field: &'static str, reason: String },
}
