use crate::{progress::TransferProgress, state::TransferState};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Source,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Target => f.write_str("target"),
        }
    }
}

/// Everything a transfer run reports about itself.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransferEvent {
    Started {
        job: String,
        batch_size: usize,
        timestamp: DateTime<Utc>,
    },

    Connected {
        side: Side,
        endpoint: String,
        timestamp: DateTime<Utc>,
    },

    ColumnsDiscovered {
        table: String,
        columns: Vec<String>,
        timestamp: DateTime<Utc>,
    },

    /// Emitted on every state transition with the counters at that moment.
    StateChanged {
        from: TransferState,
        to: TransferState,
        progress: TransferProgress,
        elapsed_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// A non-empty batch was read and is about to be written.
    BatchStarted {
        batch: u64,
        rows: usize,
        elapsed_ms: u64,
        timestamp: DateTime<Utc>,
    },

    BatchCommitted {
        batch: u64,
        rows: usize,
        total_rows: u64,
        elapsed_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The batch was rolled back; none of its rows reached the target.
    BatchFailed {
        batch: u64,
        rows: usize,
        table: String,
        error: String,
        elapsed_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The single terminal event of a failed run.
    Aborted {
        state: TransferState,
        batch: Option<u64>,
        error: String,
        progress: TransferProgress,
        elapsed_ms: u64,
        timestamp: DateTime<Utc>,
    },

    Finished {
        state: TransferState,
        progress: TransferProgress,
        elapsed_ms: u64,
        timestamp: DateTime<Utc>,
    },

    SessionCloseFailed {
        side: Side,
        endpoint: String,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

impl TransferEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TransferEvent::Started { .. } => "started",
            TransferEvent::Connected { .. } => "connected",
            TransferEvent::ColumnsDiscovered { .. } => "columns_discovered",
            TransferEvent::StateChanged { .. } => "state_changed",
            TransferEvent::BatchStarted { .. } => "batch_started",
            TransferEvent::BatchCommitted { .. } => "batch_committed",
            TransferEvent::BatchFailed { .. } => "batch_failed",
            TransferEvent::Aborted { .. } => "aborted",
            TransferEvent::Finished { .. } => "finished",
            TransferEvent::SessionCloseFailed { .. } => "session_close_failed",
        }
    }
}
