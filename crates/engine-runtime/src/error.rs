use connectors::sql::base::error::{ConnectionError, ReadError, SchemaError, WriteError};
use engine_core::{events::Side, report::TransferReport, state::TransferState};
use thiserror::Error;

/// Errors that end a transfer run.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("{side} connection failed: {source}")]
    Connection {
        side: Side,
        #[source]
        source: ConnectionError,
    },

    #[error("schema introspection failed: {0}")]
    Schema(#[from] SchemaError),

    #[error("source read failed: {0}")]
    Read(#[from] ReadError),

    /// A batch failed while the abort policy was in effect.
    #[error("batch {batch} failed and the run was aborted: {source}")]
    BatchAborted {
        batch: u64,
        #[source]
        source: WriteError,
    },
}

impl TransferError {
    /// Terminal state a run ends in when this error stops it.
    pub fn terminal_state(&self) -> TransferState {
        match self {
            TransferError::Connection { .. } | TransferError::Schema(_) => {
                TransferState::AbortedOnSetup
            }
            TransferError::Read(_) => TransferState::AbortedOnRead,
            TransferError::BatchAborted { .. } => TransferState::AbortedOnWrite,
        }
    }
}

/// A failed run: what was achieved before the failure, and why it stopped.
#[derive(Debug, Error)]
#[error("transfer {} ended in {}: {error}", report.job, report.state)]
pub struct TransferAborted {
    pub report: TransferReport,
    #[source]
    pub error: TransferError,
}
