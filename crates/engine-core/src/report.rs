use crate::{progress::TransferProgress, state::TransferState};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Final summary of a run, written by the CLI as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReport {
    pub job: String,
    pub state: TransferState,
    pub progress: TransferProgress,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransferReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
