pub mod aggregate;
pub mod enrichment;
pub mod error;
pub mod export;
pub mod nlp;
pub mod outcome;
pub mod scan;

pub use aggregate::{AggregationReport, ProductAggregator, SentimentAggregator};
pub use enrichment::{EnrichmentPipeline, EnrichmentReport};
pub use error::PipelineError;
pub use export::{ExportRenderer, ExportReport, KeyPhraseExploder, TableExporter};
pub use nlp::{BatchInvoker, HttpTextAnalyzer, NlpError, TextAnalyzer};
pub use outcome::{new_run_id, RunOutcome};
pub use scan::{CollectedReviews, PaginatedScanner};
