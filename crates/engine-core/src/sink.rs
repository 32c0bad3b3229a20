//! Destinations for [`TransferEvent`]s.

use crate::events::TransferEvent;
use std::sync::Mutex;
use tracing::{error, info, warn};

/// Receives every event of a run. Implementations must not fail the run.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &TransferEvent);

    /// Called once the run has ended.
    fn flush(&self) {}
}

/// Forwards events to `tracing` as structured records.
#[derive(Debug, Default, Clone)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &TransferEvent) {
        match event {
            TransferEvent::Started { job, batch_size, .. } => {
                info!(job = %job, batch_size, "Transfer started");
            }
            TransferEvent::Connected { side, endpoint, .. } => {
                info!(side = %side, endpoint = %endpoint, "Connected");
            }
            TransferEvent::ColumnsDiscovered { table, columns, .. } => {
                info!(table = %table, count = columns.len(), columns = ?columns, "Columns discovered");
            }
            TransferEvent::StateChanged {
                from,
                to,
                progress,
                elapsed_ms,
                ..
            } => {
                info!(
                    from = %from,
                    to = %to,
                    batches_committed = progress.batches_committed,
                    rows_transferred = progress.rows_transferred,
                    elapsed_ms,
                    "State changed"
                );
            }
            TransferEvent::BatchStarted {
                batch,
                rows,
                elapsed_ms,
                ..
            } => {
                info!(batch, rows, elapsed_ms, "Batch started");
            }
            TransferEvent::BatchCommitted {
                batch,
                rows,
                total_rows,
                elapsed_ms,
                ..
            } => {
                info!(batch, rows, total_rows, elapsed_ms, "Batch committed");
            }
            TransferEvent::BatchFailed {
                batch,
                rows,
                table,
                error,
                elapsed_ms,
                ..
            } => {
                error!(batch, rows, table = %table, error = %error, elapsed_ms, "Batch rolled back");
            }
            TransferEvent::Aborted {
                state,
                batch,
                error,
                progress,
                elapsed_ms,
                ..
            } => {
                error!(
                    state = %state,
                    batch = ?batch,
                    error = %error,
                    batches_committed = progress.batches_committed,
                    rows_transferred = progress.rows_transferred,
                    elapsed_ms,
                    "Transfer aborted"
                );
            }
            TransferEvent::Finished {
                state,
                progress,
                elapsed_ms,
                ..
            } => {
                if progress.has_failures() {
                    warn!(
                        state = %state,
                        batches_attempted = progress.batches_attempted,
                        batches_committed = progress.batches_committed,
                        batches_failed = progress.batches_failed,
                        rows_transferred = progress.rows_transferred,
                        rows_failed = progress.rows_failed,
                        elapsed_ms,
                        "Transfer finished with failed batches"
                    );
                } else {
                    info!(
                        state = %state,
                        batches_committed = progress.batches_committed,
                        rows_transferred = progress.rows_transferred,
                        elapsed_ms,
                        "Transfer finished"
                    );
                }
            }
            TransferEvent::SessionCloseFailed {
                side,
                endpoint,
                error,
                ..
            } => {
                warn!(side = %side, endpoint = %endpoint, error = %error, "Failed to close session");
            }
        }
    }
}

/// Keeps every event in memory, for assertions.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<TransferEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TransferEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(TransferEvent::name).collect()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: &TransferEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EventSink, RecordingEventSink, TracingEventSink};
    use crate::events::TransferEvent;
    use chrono::Utc;
    use tracing_test::traced_test;

    fn committed(batch: u64) -> TransferEvent {
        TransferEvent::BatchCommitted {
            batch,
            rows: 500,
            total_rows: batch * 500,
            elapsed_ms: 12,
            timestamp: Utc::now(),
        }
    }

    #[test]
    #[traced_test]
    fn test_tracing_sink_logs_structured_fields() {
        TracingEventSink.emit(&committed(2));
        assert!(logs_contain("Batch committed"));
        assert!(logs_contain("batch=2"));
        assert!(logs_contain("total_rows=1000"));
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingEventSink::new();
        sink.emit(&committed(1));
        sink.emit(&committed(2));
        assert_eq!(sink.names(), vec!["batch_committed", "batch_committed"]);
    }
}
