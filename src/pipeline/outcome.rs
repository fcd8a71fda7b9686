use serde::Serialize;
use uuid::Uuid;

use super::error::PipelineError;

pub const STATUS_OK: u16 = 200;
pub const STATUS_FAILED: u16 = 500;

/// Aggregate result of one run: a status code plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    pub status_code: u16,
    pub body: String,
    pub run_id: String,
}

impl RunOutcome {
    pub fn success(run_id: &str, body: impl Into<String>) -> Self {
        Self {
            status_code: STATUS_OK,
            body: body.into(),
            run_id: run_id.to_string(),
        }
    }

    pub fn failure(run_id: &str, error: &PipelineError) -> Self {
        Self {
            status_code: STATUS_FAILED,
            body: format!("Run failed: {error}"),
            run_id: run_id.to_string(),
        }
    }

    pub fn from_result(run_id: &str, result: Result<String, PipelineError>) -> Self {
        match result {
            Ok(message) => Self::success(run_id, message),
            Err(e) => {
                tracing::error!(run_id, error = %e, "Run aborted");
                Self::failure(run_id, &e)
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

/// Correlation id attached to every log line of a run.
pub fn new_run_id() -> String {
    Uuid::new_v4().to_string()
}
