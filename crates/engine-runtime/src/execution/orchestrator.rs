//! The chunked copy loop.
//!
//! One run walks `Initializing -> Introspecting -> Streaming(n) -> terminal`,
//! reading batch `n`, writing it in its own transaction, then reading `n + 1`.
//! Nothing runs concurrently. Sessions are closed on every exit path.

use crate::error::{TransferAborted, TransferError};
use chrono::{DateTime, Utc};
use connectors::sql::base::{
    error::SchemaError,
    provider::ConnectionProvider,
    session::{SourceSession, TargetSession},
};
use engine_core::{
    events::{Side, TransferEvent},
    progress::TransferProgress,
    report::TransferReport,
    sink::EventSink,
    state::TransferState,
};
use model::execution::job::{BatchErrorPolicy, TransferJob};
use std::{sync::Arc, time::Instant};

pub struct TransferOrchestrator {
    provider: Arc<dyn ConnectionProvider>,
    sink: Arc<dyn EventSink>,
}

/// Mutable bookkeeping of one run.
struct Run<'a> {
    job: &'a TransferJob,
    state: TransferState,
    progress: TransferProgress,
    started: Instant,
    started_at: DateTime<Utc>,
}

impl<'a> Run<'a> {
    fn new(job: &'a TransferJob) -> Self {
        Self {
            job,
            state: TransferState::Initializing,
            progress: TransferProgress::default(),
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn report(&self, error: Option<String>) -> TransferReport {
        TransferReport {
            job: self.job.label(),
            state: self.state,
            progress: self.progress,
            started_at: self.started_at,
            finished_at: Utc::now(),
            elapsed_ms: self.elapsed_ms(),
            error,
        }
    }
}

/// Sessions opened so far. Whatever is here gets closed when the run ends.
#[derive(Default)]
struct Sessions {
    source: Option<Box<dyn SourceSession>>,
    target: Option<Box<dyn TargetSession>>,
}

impl TransferOrchestrator {
    pub fn new(provider: Arc<dyn ConnectionProvider>, sink: Arc<dyn EventSink>) -> Self {
        Self { provider, sink }
    }

    pub async fn run(&self, job: &TransferJob) -> Result<TransferReport, TransferAborted> {
        let mut run = Run::new(job);
        self.sink.emit(&TransferEvent::Started {
            job: job.label(),
            batch_size: job.batch_size,
            timestamp: Utc::now(),
        });

        let mut sessions = Sessions::default();
        let outcome = self.execute(&mut run, &mut sessions).await;
        self.release(sessions).await;

        let result = match outcome {
            Ok(()) => {
                let terminal = if run.progress.has_failures() {
                    TransferState::CompletedWithErrors
                } else {
                    TransferState::Completed
                };
                self.transition(&mut run, terminal);
                self.sink.emit(&TransferEvent::Finished {
                    state: run.state,
                    progress: run.progress,
                    elapsed_ms: run.elapsed_ms(),
                    timestamp: Utc::now(),
                });
                Ok(run.report(None))
            }
            Err(error) => {
                let batch = match &error {
                    TransferError::BatchAborted { batch, .. } => Some(*batch),
                    TransferError::Read(_) => Some(run.progress.batches_attempted + 1),
                    _ => None,
                };
                self.transition(&mut run, error.terminal_state());
                self.sink.emit(&TransferEvent::Aborted {
                    state: run.state,
                    batch,
                    error: error.to_string(),
                    progress: run.progress,
                    elapsed_ms: run.elapsed_ms(),
                    timestamp: Utc::now(),
                });
                Err(TransferAborted {
                    report: run.report(Some(error.to_string())),
                    error,
                })
            }
        };

        self.sink.flush();
        result
    }

    async fn execute(&self, run: &mut Run<'_>, sessions: &mut Sessions) -> Result<(), TransferError> {
        let job = run.job;

        let source = self
            .provider
            .open_source(&job.source)
            .await
            .map_err(|source| TransferError::Connection {
                side: Side::Source,
                source,
            })?;
        self.connected(Side::Source, source.endpoint());
        let source = sessions.source.insert(source);

        let target = self
            .provider
            .open_target(&job.target, job.insert_mode)
            .await
            .map_err(|source| TransferError::Connection {
                side: Side::Target,
                source,
            })?;
        self.connected(Side::Target, target.endpoint());
        let target = sessions.target.insert(target);

        self.transition(run, TransferState::Introspecting);
        let columns = source.column_list(&job.source_table).await?;
        self.sink.emit(&TransferEvent::ColumnsDiscovered {
            table: job.source_table.to_string(),
            columns: columns.names().to_vec(),
            timestamp: Utc::now(),
        });

        if job.verify_target_columns {
            let target_columns = target.column_list(&job.target_table).await?;
            let missing = columns.missing_from(&target_columns);
            if !missing.is_empty() {
                return Err(SchemaError::ColumnMismatch {
                    table: job.target_table.to_string(),
                    missing,
                }
                .into());
            }
        }

        source
            .open_stream(&job.source_table, &columns, &job.order_by)
            .await?;
        self.transition(run, TransferState::Streaming(1));

        loop {
            let batch = source.next_batch(job.batch_size).await?;
            if batch.is_empty() {
                break;
            }

            let number = run.progress.begin_batch();
            if number > 1 {
                self.transition(run, TransferState::Streaming(number));
            }
            self.sink.emit(&TransferEvent::BatchStarted {
                batch: number,
                rows: batch.len(),
                elapsed_ms: run.elapsed_ms(),
                timestamp: Utc::now(),
            });

            match target
                .write_batch(&job.target_table, &columns, &batch)
                .await
            {
                Ok(()) => {
                    run.progress.record_commit(batch.len());
                    self.sink.emit(&TransferEvent::BatchCommitted {
                        batch: number,
                        rows: batch.len(),
                        total_rows: run.progress.rows_transferred,
                        elapsed_ms: run.elapsed_ms(),
                        timestamp: Utc::now(),
                    });
                }
                Err(error) => {
                    run.progress.record_failure(batch.len());
                    self.sink.emit(&TransferEvent::BatchFailed {
                        batch: number,
                        rows: batch.len(),
                        table: job.target_table.to_string(),
                        error: error.to_string(),
                        elapsed_ms: run.elapsed_ms(),
                        timestamp: Utc::now(),
                    });

                    if job.on_batch_error == BatchErrorPolicy::Abort {
                        return Err(TransferError::BatchAborted {
                            batch: number,
                            source: error,
                        });
                    }
                }
            }
        }

        source.close_stream().await?;
        Ok(())
    }

    fn transition(&self, run: &mut Run<'_>, to: TransferState) {
        let from = run.state;
        run.state = to;
        self.sink.emit(&TransferEvent::StateChanged {
            from,
            to,
            progress: run.progress,
            elapsed_ms: run.elapsed_ms(),
            timestamp: Utc::now(),
        });
    }

    fn connected(&self, side: Side, endpoint: &str) {
        self.sink.emit(&TransferEvent::Connected {
            side,
            endpoint: endpoint.to_string(),
            timestamp: Utc::now(),
        });
    }

    async fn release(&self, sessions: Sessions) {
        if let Some(source) = sessions.source {
            let endpoint = source.endpoint().to_string();
            if let Err(error) = source.close().await {
                self.close_failed(Side::Source, endpoint, error.to_string());
            }
        }
        if let Some(target) = sessions.target {
            let endpoint = target.endpoint().to_string();
            if let Err(error) = target.close().await {
                self.close_failed(Side::Target, endpoint, error.to_string());
            }
        }
    }

    fn close_failed(&self, side: Side, endpoint: String, error: String) {
        self.sink.emit(&TransferEvent::SessionCloseFailed {
            side,
            endpoint,
            error,
            timestamp: Utc::now(),
        });
    }
}
