use std::path::PathBuf;

use serde::Serialize;

use crate::pipeline::PipelineError;

/// Application-level constants
pub const APP_NAME: &str = "ReviewInsights";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum texts per NLP batch call (external service limit).
pub const DEFAULT_BATCH_SIZE: usize = 25;

/// Items requested per table scan page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Language code sent with every NLP request.
pub const LANGUAGE_CODE: &str = "en";

/// Number of phrases kept in a summary digest.
pub const DIGEST_SIZE: usize = 10;

pub const DEFAULT_BUCKET: &str = "customer-reviews";
pub const DEFAULT_NLP_URL: &str = "http://localhost:8089";

const ENV_DATA_DIR: &str = "REVIEW_INSIGHTS_DATA_DIR";
const ENV_BUCKET: &str = "REVIEW_INSIGHTS_BUCKET";
const ENV_NLP_URL: &str = "REVIEW_INSIGHTS_NLP_URL";
const ENV_BATCH_SIZE: &str = "REVIEW_INSIGHTS_BATCH_SIZE";
const ENV_PAGE_SIZE: &str = "REVIEW_INSIGHTS_PAGE_SIZE";

/// Default `tracing` filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "review_insights=info"
}

/// Get the application data directory.
/// ~/ReviewInsights/ unless the home directory cannot be resolved.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Blob keys for every artifact the pipeline reads or writes.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactKeys {
    pub table_dump_json: String,
    pub table_dump_csv: String,
    pub cleaned_csv: String,
    pub cleaned_manifest: String,
    pub key_phrases_csv: String,
    pub key_phrases_manifest: String,
}

impl Default for ArtifactKeys {
    fn default() -> Self {
        Self {
            table_dump_json: "table-export/CustomerReviewsAnalysis.json".into(),
            table_dump_csv: "table-export/CustomerReviewsAnalysis.csv".into(),
            cleaned_csv: "table-export/bi-cleaned/CustomerReviewsAnalysis_Cleaned.csv".into(),
            cleaned_manifest: "table-export/bi-cleaned/manifest.json".into(),
            key_phrases_csv: "table-export/key-phrases/CustomerReviewAnalysis_KeyPhrases.csv".into(),
            key_phrases_manifest: "table-export/key-phrases/keyPhrasesManifest.json".into(),
        }
    }
}

/// Runtime settings for a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSettings {
    pub data_dir: PathBuf,
    pub bucket: String,
    pub nlp_base_url: String,
    pub batch_size: usize,
    pub page_size: usize,
    pub artifacts: ArtifactKeys,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            data_dir: app_data_dir(),
            bucket: DEFAULT_BUCKET.into(),
            nlp_base_url: DEFAULT_NLP_URL.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            artifacts: ArtifactKeys::default(),
        }
    }
}

impl PipelineSettings {
    /// Build settings from `REVIEW_INSIGHTS_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PipelineError> {
        let mut settings = Self::default();

        if let Some(dir) = lookup(ENV_DATA_DIR) {
            settings.data_dir = PathBuf::from(dir);
        }
        if let Some(bucket) = lookup(ENV_BUCKET) {
            settings.bucket = bucket;
        }
        if let Some(url) = lookup(ENV_NLP_URL) {
            settings.nlp_base_url = url;
        }
        if let Some(raw) = lookup(ENV_BATCH_SIZE) {
            settings.batch_size = parse_positive(ENV_BATCH_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            settings.page_size = parse_positive(ENV_PAGE_SIZE, &raw)?;
        }

        Ok(settings)
    }

    /// SQLite file backing the review and summary tables.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("reviews.db")
    }

    /// Root directory under which bucket directories live.
    pub fn blob_root(&self) -> PathBuf {
        self.data_dir.join("blobs")
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<usize, PipelineError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(PipelineError::Config(format!(
            "{name} must be a positive integer, got '{raw}'"
        ))),
    }
}
