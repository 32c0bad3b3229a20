#![allow(dead_code)]

use engine_core::{
    report::TransferReport,
    sink::{RecordingEventSink, TracingEventSink},
};
use engine_runtime::{error::TransferAborted, execution::executor};
use model::execution::job::TransferJob;
use std::sync::Arc;
use tokio_postgres::Client;

/// A table exercising types whose text form must survive the trip unchanged.
pub const ORDERS_TABLE_DDL: &str = r#"(
  id BIGINT PRIMARY KEY,
  customer TEXT,
  total NUMERIC(12, 2),
  ratio DOUBLE PRECISION,
  placed_at TIMESTAMPTZ,
  due DATE,
  active BOOLEAN,
  tags TEXT[],
  payload JSONB,
  blob BYTEA,
  ref UUID,
  wait INTERVAL
)"#;

pub const ORDERS_SEED: &str = r#"
SELECT g,
       CASE WHEN g % 7 = 0 THEN NULL ELSE 'customer ''' || g || '''' END,
       (g * 1.25)::numeric(12, 2),
       g / 3.0,
       TIMESTAMPTZ '2024-01-01 00:00:00+00' + g * INTERVAL '1 minute',
       DATE '2024-01-01' + g,
       g % 2 = 0,
       ARRAY['a', 'b,c', 'd"e'],
       jsonb_build_object('n', g, 's', 'x"y'),
       decode(md5(g::text), 'hex'),
       md5(g::text)::uuid,
       g * INTERVAL '1 second'
FROM generate_series(1, $1::int) AS g
"#;

pub async fn create_orders(client: &Client, schema: &str, table: &str, rows: i32) {
    client
        .batch_execute(&format!(r#"CREATE TABLE "{schema}"."{table}" {ORDERS_TABLE_DDL}"#))
        .await
        .expect("create table");
    if rows > 0 {
        client
            .execute(
                &format!(r#"INSERT INTO "{schema}"."{table}" {ORDERS_SEED}"#),
                &[&rows],
            )
            .await
            .expect("seed table");
    }
}

pub async fn row_count(client: &Client, schema: &str, table: &str) -> i64 {
    client
        .query_one(&format!(r#"SELECT count(*) FROM "{schema}"."{table}""#), &[])
        .await
        .expect("count rows")
        .get(0)
}

/// Rows present in one table but not the other, in either direction.
pub async fn difference(client: &Client, left: (&str, &str), right: (&str, &str)) -> i64 {
    let sql = format!(
        r#"SELECT count(*) FROM (
             (SELECT * FROM "{0}"."{1}" EXCEPT SELECT * FROM "{2}"."{3}")
             UNION ALL
             (SELECT * FROM "{2}"."{3}" EXCEPT SELECT * FROM "{0}"."{1}")
           ) d"#,
        left.0, left.1, right.0, right.1
    );
    client
        .query_one(&sql, &[])
        .await
        .expect("compare tables")
        .get(0)
}

pub async fn run_job(job: &TransferJob) -> Result<TransferReport, TransferAborted> {
    executor::run(job, Arc::new(TracingEventSink)).await
}

/// Runs `job` keeping every emitted event for inspection.
pub async fn run_job_recorded(
    job: &TransferJob,
) -> (Result<TransferReport, TransferAborted>, Arc<RecordingEventSink>) {
    let sink = Arc::new(RecordingEventSink::new());
    let result = executor::run(job, sink.clone()).await;
    (result, sink)
}
