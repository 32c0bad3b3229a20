use crate::{core::identifiers::TableRef, execution::connection::ConnectionConfig};
use serde::{Deserialize, Serialize};

/// What happens to the run after a batch fails to commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchErrorPolicy {
    /// Roll the batch back, log it and keep going.
    #[default]
    Skip,
    /// Roll the batch back and stop the run.
    Abort,
}

/// How a batch is turned into INSERT statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertMode {
    /// One prepared single-row insert, executed per row.
    #[default]
    Row,
    /// Multi-row `VALUES` lists, chunked under the bind parameter limit.
    MultiRow,
}

/// Everything one invocation needs. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct TransferJob {
    pub source: ConnectionConfig,
    pub target: ConnectionConfig,
    pub source_table: TableRef,
    pub target_table: TableRef,
    pub batch_size: usize,
    pub on_batch_error: BatchErrorPolicy,
    pub insert_mode: InsertMode,
    pub order_by: Vec<String>,
    pub verify_target_columns: bool,
}

impl TransferJob {
    pub fn new(
        source: ConnectionConfig,
        target: ConnectionConfig,
        source_table: TableRef,
        target_table: TableRef,
        batch_size: usize,
    ) -> Self {
        Self {
            source,
            target,
            source_table,
            target_table,
            batch_size,
            on_batch_error: BatchErrorPolicy::default(),
            insert_mode: InsertMode::default(),
            order_by: Vec::new(),
            verify_target_columns: false,
        }
    }

    pub fn with_policy(mut self, policy: BatchErrorPolicy) -> Self {
        self.on_batch_error = policy;
        self
    }

    pub fn with_insert_mode(mut self, mode: InsertMode) -> Self {
        self.insert_mode = mode;
        self
    }

    pub fn with_order_by(mut self, columns: Vec<String>) -> Self {
        self.order_by = columns;
        self
    }

    pub fn with_target_verification(mut self, verify: bool) -> Self {
        self.verify_target_columns = verify;
        self
    }

    /// Short human label used in events and reports.
    pub fn label(&self) -> String {
        format!("{} -> {}", self.source_table, self.target_table)
    }
}
