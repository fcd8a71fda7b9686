//! Stage runner: wires collaborators from settings and runs one stage (or
//! every stage in data-flow order), producing a `RunOutcome`.

use chrono::NaiveDate;

use crate::config::{PipelineSettings, DIGEST_SIZE, LANGUAGE_CODE};
use crate::db::{open_database, ReviewTable, SqliteReviewTable, SqliteSummaryTable, SummaryTable};
use crate::pipeline::{
    new_run_id, BatchInvoker, EnrichmentPipeline, ExportRenderer, HttpTextAnalyzer,
    KeyPhraseExploder, PipelineError, ProductAggregator, RunOutcome, SentimentAggregator,
    TableExporter, TextAnalyzer,
};
use crate::storage::{BlobStore, FsBlobStore};

/// One runnable unit of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Enrich the raw review CSV stored under `source_key`.
    Enrich { source_key: String },
    SummarizeProducts,
    SummarizeSentiments,
    ExportTable,
    ExportCleaned,
    ExportKeyPhrases,
    /// Every stage above, in data-flow order, stopping at the first failure.
    All { source_key: String },
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Enrich { .. } => "enrich",
            Self::SummarizeProducts => "summarize-products",
            Self::SummarizeSentiments => "summarize-sentiments",
            Self::ExportTable => "export-table",
            Self::ExportCleaned => "export-cleaned",
            Self::ExportKeyPhrases => "export-key-phrases",
            Self::All { .. } => "all",
        }
    }
}

/// Collaborators and parameters shared by every stage of a run.
pub struct StageContext<'a> {
    pub reviews: &'a dyn ReviewTable,
    pub summaries: &'a dyn SummaryTable,
    pub blobs: &'a dyn BlobStore,
    pub analyzer: &'a dyn TextAnalyzer,
    pub settings: &'a PipelineSettings,
    /// Summary date for aggregation stages.
    pub today: NaiveDate,
}

/// Run `stage` against explicit collaborators. Returns the run message.
pub fn run_with(stage: &Stage, ctx: &StageContext<'_>) -> Result<String, PipelineError> {
    let settings = ctx.settings;
    let artifacts = &settings.artifacts;

    match stage {
        Stage::Enrich { source_key } => {
            let invoker = BatchInvoker::new(settings.batch_size, LANGUAGE_CODE)?;
            let report = EnrichmentPipeline::new(ctx.analyzer, ctx.reviews, invoker)
                .run_from_blob(ctx.blobs, source_key)?;
            Ok(format!(
                "Processed {} reviews ({} skipped)",
                report.records_upserted, report.rows_skipped
            ))
        }
        Stage::SummarizeProducts => {
            let report =
                ProductAggregator::new(ctx.reviews, ctx.summaries, settings.page_size, DIGEST_SIZE)
                    .run(ctx.today)?;
            Ok(format!(
                "Product summaries generated for {} products",
                report.summaries_written
            ))
        }
        Stage::SummarizeSentiments => {
            let report =
                SentimentAggregator::new(ctx.reviews, ctx.summaries, settings.page_size, DIGEST_SIZE)
                    .run(ctx.today)?;
            if report.reviews_scanned == 0 {
                Ok("No reviews found for summarization.".to_string())
            } else {
                Ok(format!(
                    "Sentiment summaries generated for {} labels",
                    report.summaries_written
                ))
            }
        }
        Stage::ExportTable => {
            let report = TableExporter::new(ctx.reviews, ctx.blobs, settings.page_size, artifacts).run()?;
            Ok(format!("Exported {} reviews to {}", report.rows_written, report.location))
        }
        Stage::ExportCleaned => {
            let report = ExportRenderer::new(ctx.blobs, artifacts).run()?;
            Ok(format!(
                "Cleaned CSV with {} rows written to {}",
                report.rows_written, report.location
            ))
        }
        Stage::ExportKeyPhrases => {
            let report = KeyPhraseExploder::new(ctx.blobs, artifacts).run()?;
            Ok(format!(
                "Key phrase CSV with {} rows written to {}",
                report.rows_written, report.location
            ))
        }
        Stage::All { source_key } => {
            let sequence = [
                Stage::Enrich {
                    source_key: source_key.clone(),
                },
                Stage::SummarizeProducts,
                Stage::SummarizeSentiments,
                Stage::ExportTable,
                Stage::ExportCleaned,
                Stage::ExportKeyPhrases,
            ];
            let mut messages = Vec::with_capacity(sequence.len());
            for step in &sequence {
                tracing::info!(stage = step.name(), "Stage starting");
                messages.push(run_with(step, ctx)?);
            }
            Ok(messages.join("; "))
        }
    }
}

/// Run `stage` against the SQLite database, blob directory and NLP service
/// named in `settings`.
pub fn run_stage(stage: &Stage, settings: &PipelineSettings) -> RunOutcome {
    let run_id = new_run_id();
    let span = tracing::info_span!("run", run_id = %run_id, stage = stage.name());
    let _guard = span.enter();

    tracing::info!(data_dir = %settings.data_dir.display(), "Run starting");
    let outcome = RunOutcome::from_result(&run_id, execute(stage, settings));
    tracing::info!(status = outcome.status_code, "Run finished");
    outcome
}

fn execute(stage: &Stage, settings: &PipelineSettings) -> Result<String, PipelineError> {
    std::fs::create_dir_all(&settings.data_dir)?;
    let conn = open_database(&settings.database_path())?;
    let reviews = SqliteReviewTable::new(&conn);
    let summaries = SqliteSummaryTable::new(&conn);
    let blobs = FsBlobStore::new(&settings.blob_root(), &settings.bucket);
    let analyzer = HttpTextAnalyzer::new(&settings.nlp_base_url)?;

    let ctx = StageContext {
        reviews: &reviews,
        summaries: &summaries,
        blobs: &blobs,
        analyzer: &analyzer,
        settings,
        today: chrono::Local::now().date_naive(),
    };
    run_with(stage, &ctx)
}
