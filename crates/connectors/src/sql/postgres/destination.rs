use crate::sql::{
    base::{
        error::{ConnectionError, SchemaError, WriteError},
        session::{BatchWriter, SchemaIntrospector, Session},
    },
    postgres::{
        error::{PgDriverError, driver_error},
        metadata,
        params::PgParamStore,
        utils::{self, PgConnection},
    },
};
use async_trait::async_trait;
use model::{
    core::identifiers::TableRef,
    execution::job::InsertMode,
    records::{batch::RowBatch, columns::ColumnList},
};
use planner::query::{dialect, generator::QueryGenerator};
use tokio_postgres::{Statement, Transaction};
use tracing::{debug, warn};

/// The target side of a transfer. Every `write_batch` call is one
/// transaction: it either commits all rows or none.
pub struct PgDestination {
    conn: PgConnection,
    endpoint: String,
    dialect: dialect::Postgres,
    insert_mode: InsertMode,
    prepared: Option<PreparedInsert>,
}

struct PreparedInsert {
    table: TableRef,
    columns: ColumnList,
    statement: Statement,
}

impl PgDestination {
    pub(crate) fn new(conn: PgConnection, endpoint: String, insert_mode: InsertMode) -> Self {
        Self {
            conn,
            endpoint,
            dialect: dialect::Postgres,
            insert_mode,
            prepared: None,
        }
    }

    /// Single-row insert statement, prepared once per table/column pair.
    async fn row_statement(
        &mut self,
        table: &TableRef,
        columns: &ColumnList,
    ) -> Result<Statement, WriteError> {
        if let Some(prepared) = &self.prepared
            && prepared.table == *table
            && prepared.columns == *columns
        {
            return Ok(prepared.statement.clone());
        }

        let sql = QueryGenerator::new(&self.dialect).insert_row_template(table, columns);
        let statement = self
            .conn
            .client
            .prepare(&sql)
            .await
            .map_err(|e| WriteError::Prepare {
                table: table.to_string(),
                source: driver_error(e),
            })?;

        debug!(table = %table, sql = %sql, "Prepared insert");
        self.prepared = Some(PreparedInsert {
            table: table.clone(),
            columns: columns.clone(),
            statement: statement.clone(),
        });
        Ok(statement)
    }

    async fn insert_per_row(
        tx: &Transaction<'_>,
        statement: &Statement,
        table: &TableRef,
        batch: &RowBatch,
    ) -> Result<(), WriteError> {
        for (i, row) in batch.iter().enumerate() {
            let bindings = PgParamStore::from_values(row.values());
            tx.execute(statement, &bindings.as_refs())
                .await
                .map_err(|e| WriteError::Insert {
                    table: table.to_string(),
                    row: i + 1,
                    source: driver_error(e),
                })?;
        }
        Ok(())
    }

    async fn insert_multi_row(
        tx: &Transaction<'_>,
        dialect: &dialect::Postgres,
        table: &TableRef,
        columns: &ColumnList,
        batch: &RowBatch,
    ) -> Result<(), WriteError> {
        let generator = QueryGenerator::new(dialect);
        let per_statement = generator.rows_per_statement(columns.len());

        for (i, (sql, params)) in generator
            .insert_rows(table, columns, &batch.rows)
            .iter()
            .enumerate()
        {
            let bindings = PgParamStore::from_values(params);
            tx.execute(sql.as_str(), &bindings.as_refs())
                .await
                .map_err(|e| WriteError::Insert {
                    table: table.to_string(),
                    row: i * per_statement + 1,
                    source: driver_error(e),
                })?;
        }
        Ok(())
    }
}

#[async_trait]
impl Session for PgDestination {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn ping(&mut self) -> Result<(), ConnectionError> {
        utils::ping(&self.conn.client, &self.endpoint).await
    }

    async fn close(self: Box<Self>) -> Result<(), ConnectionError> {
        let PgDestination { conn, endpoint, .. } = *self;
        utils::shutdown(conn, &endpoint).await
    }
}

#[async_trait]
impl SchemaIntrospector for PgDestination {
    async fn column_list(&mut self, table: &TableRef) -> Result<ColumnList, SchemaError> {
        metadata::column_list(&self.conn.client, table).await
    }
}

#[async_trait]
impl BatchWriter for PgDestination {
    async fn write_batch(
        &mut self,
        table: &TableRef,
        columns: &ColumnList,
        batch: &RowBatch,
    ) -> Result<(), WriteError> {
        if batch.is_empty() {
            return Ok(());
        }

        for (i, row) in batch.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(WriteError::RowShape {
                    row: i + 1,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }

        let statement = match self.insert_mode {
            InsertMode::Row => Some(self.row_statement(table, columns).await?),
            InsertMode::MultiRow => None,
        };

        let tx = self
            .conn
            .client
            .transaction()
            .await
            .map_err(|e| WriteError::Begin {
                table: table.to_string(),
                source: driver_error(e),
            })?;

        let result = match &statement {
            Some(statement) => Self::insert_per_row(&tx, statement, table, batch).await,
            None => Self::insert_multi_row(&tx, &self.dialect, table, columns, batch).await,
        };

        if let Err(err) = result {
            if let Err(error) = tx.rollback().await {
                warn!(error = %PgDriverError::from(error), table = %table, "Rollback failed");
            }
            return Err(err);
        }

        tx.commit().await.map_err(|e| WriteError::Commit {
            table: table.to_string(),
            source: driver_error(e),
        })
    }
}
