//! Command-line surface of the `review-insights` binary.

use clap::{Parser, Subcommand};

use crate::runner::Stage;

#[derive(Debug, Parser)]
#[command(
    name = "review-insights",
    version,
    about = "Enrich customer reviews with NLP and build summaries and BI exports",
    after_help = "Storage locations and the NLP endpoint come from REVIEW_INSIGHTS_* environment variables."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Enrich a raw review CSV and upsert the results
    Enrich {
        #[arg(value_name = "KEY", help = "Blob key of the raw review CSV")]
        source_key: String,
    },
    /// Write today's per-product summaries
    SummarizeProducts,
    /// Write today's per-sentiment summaries
    SummarizeSentiments,
    /// Dump the review table to JSON and CSV
    ExportTable,
    /// Build the cleaned BI CSV and its manifest
    ExportCleaned,
    /// Build the exploded key-phrase CSV and its manifest
    ExportKeyPhrases,
    /// Run every stage in order
    All {
        #[arg(value_name = "KEY", help = "Blob key of the raw review CSV")]
        source_key: String,
    },
}

impl From<Command> for Stage {
    fn from(command: Command) -> Self {
        match command {
            Command::Enrich { source_key } => Stage::Enrich { source_key },
            Command::SummarizeProducts => Stage::SummarizeProducts,
            Command::SummarizeSentiments => Stage::SummarizeSentiments,
            Command::ExportTable => Stage::ExportTable,
            Command::ExportCleaned => Stage::ExportCleaned,
            Command::ExportKeyPhrases => Stage::ExportKeyPhrases,
            Command::All { source_key } => Stage::All { source_key },
        }
    }
}
