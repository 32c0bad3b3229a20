use crate::{
    error::TransferAborted,
    execution::orchestrator::TransferOrchestrator,
};
use connectors::sql::postgres::provider::PgConnectionProvider;
use engine_core::{report::TransferReport, sink::EventSink};
use model::execution::job::TransferJob;
use std::sync::Arc;
use tracing::info;

/// Runs `job` against PostgreSQL on both sides.
pub async fn run(
    job: &TransferJob,
    sink: Arc<dyn EventSink>,
) -> Result<TransferReport, TransferAborted> {
    info!(job = %job.label(), "Running transfer");
    TransferOrchestrator::new(Arc::new(PgConnectionProvider), sink)
        .run(job)
        .await
}
