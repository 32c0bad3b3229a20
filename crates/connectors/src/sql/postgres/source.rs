use crate::sql::{
    base::{
        error::{ConnectionError, ReadError, SchemaError},
        session::{BatchReader, SchemaIntrospector, Session},
    },
    postgres::{
        error::{PgDriverError, driver_error},
        metadata,
        utils::{self, PgConnection},
    },
};
use async_trait::async_trait;
use model::{
    core::{identifiers::TableRef, value::Value},
    records::{batch::RowBatch, columns::ColumnList, row::Row},
};
use planner::query::{dialect, generator::QueryGenerator};
use tokio_postgres::SimpleQueryMessage;
use tracing::{debug, warn};
use uuid::Uuid;

/// The source side of a transfer: a read-only session that streams one table
/// through a server-side cursor.
pub struct PgSource {
    conn: PgConnection,
    endpoint: String,
    dialect: dialect::Postgres,
    cursor: Option<OpenCursor>,
}

struct OpenCursor {
    name: String,
    table: TableRef,
    width: usize,
    exhausted: bool,
}

impl PgSource {
    pub(crate) fn new(conn: PgConnection, endpoint: String) -> Self {
        Self {
            conn,
            endpoint,
            dialect: dialect::Postgres,
            cursor: None,
        }
    }

    fn cursor_name() -> String {
        format!("tablecopy_{}", Uuid::new_v4().simple())
    }

    async fn rollback_quietly(&self) {
        if let Err(error) = self.conn.client.batch_execute("ROLLBACK").await {
            warn!(
                error = %PgDriverError::from(error),
                endpoint = %self.endpoint,
                "Failed to roll back read transaction"
            );
        }
    }
}

#[async_trait]
impl Session for PgSource {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn ping(&mut self) -> Result<(), ConnectionError> {
        utils::ping(&self.conn.client, &self.endpoint).await
    }

    async fn close(self: Box<Self>) -> Result<(), ConnectionError> {
        let mut this = *self;
        if this.cursor.is_some()
            && let Err(error) = this.close_stream().await
        {
            warn!(%error, endpoint = %this.endpoint, "Read stream was not closed cleanly");
        }
        let PgSource { conn, endpoint, .. } = this;
        utils::shutdown(conn, &endpoint).await
    }
}

#[async_trait]
impl SchemaIntrospector for PgSource {
    async fn column_list(&mut self, table: &TableRef) -> Result<ColumnList, SchemaError> {
        metadata::column_list(&self.conn.client, table).await
    }
}

#[async_trait]
impl BatchReader for PgSource {
    async fn open_stream(
        &mut self,
        table: &TableRef,
        columns: &ColumnList,
        order_by: &[String],
    ) -> Result<(), ReadError> {
        if self.cursor.is_some() {
            self.close_stream().await?;
        }

        let name = Self::cursor_name();
        let declare =
            QueryGenerator::new(&self.dialect).declare_cursor(&name, table, columns, order_by);
        let sql = format!("BEGIN ISOLATION LEVEL REPEATABLE READ READ ONLY; {declare}");

        if let Err(e) = self.conn.client.batch_execute(&sql).await {
            self.rollback_quietly().await;
            return Err(ReadError::Open {
                table: table.to_string(),
                source: driver_error(e),
            });
        }

        debug!(table = %table, cursor = %name, "Opened read cursor");
        self.cursor = Some(OpenCursor {
            name,
            table: table.clone(),
            width: columns.len(),
            exhausted: false,
        });
        Ok(())
    }

    async fn next_batch(&mut self, max_rows: usize) -> Result<RowBatch, ReadError> {
        let cursor = self.cursor.as_mut().ok_or(ReadError::NotOpen)?;
        if cursor.exhausted || max_rows == 0 {
            return Ok(RowBatch::empty());
        }

        let sql = QueryGenerator::new(&self.dialect).fetch_forward(&cursor.name, max_rows);
        let messages = self
            .conn
            .client
            .simple_query(&sql)
            .await
            .map_err(|e| ReadError::Fetch {
                table: cursor.table.to_string(),
                source: driver_error(e),
            })?;

        let mut rows = Vec::with_capacity(messages.len());
        for message in messages {
            let SimpleQueryMessage::Row(row) = message else {
                continue;
            };
            if row.len() != cursor.width {
                return Err(ReadError::Shape {
                    table: cursor.table.to_string(),
                    expected: cursor.width,
                    found: row.len(),
                });
            }
            let values = (0..row.len())
                .map(|i| row.get(i).map(Value::from).unwrap_or(Value::Null))
                .collect();
            rows.push(Row::new(values));
        }

        if rows.len() < max_rows {
            cursor.exhausted = true;
        }
        Ok(RowBatch::new(rows))
    }

    async fn close_stream(&mut self) -> Result<(), ReadError> {
        let Some(cursor) = self.cursor.take() else {
            return Ok(());
        };

        let close = QueryGenerator::new(&self.dialect).close_cursor(&cursor.name);
        if let Err(e) = self
            .conn
            .client
            .batch_execute(&format!("{close}; COMMIT"))
            .await
        {
            self.rollback_quietly().await;
            return Err(ReadError::Close(driver_error(e)));
        }

        debug!(table = %cursor.table, cursor = %cursor.name, "Closed read cursor");
        Ok(())
    }
}
