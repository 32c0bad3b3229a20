use crate::sql::{base::error::SchemaError, postgres::error::driver_error};
use model::{core::identifiers::TableRef, records::columns::ColumnList};
use tokio_postgres::Client;
use tracing::debug;

const QUERY_COLUMN_LIST_SQL: &str = include_str!("sql/column_list.sql");

/// Column names of `table` in ordinal order. Schema and table names are
/// matched exactly, so case and special characters must already be as stored
/// in the catalog.
pub(crate) async fn column_list(client: &Client, table: &TableRef) -> Result<ColumnList, SchemaError> {
    let rows = client
        .query(QUERY_COLUMN_LIST_SQL, &[&table.schema, &table.name])
        .await
        .map_err(|e| SchemaError::Query {
            table: table.to_string(),
            source: driver_error(e),
        })?;

    if rows.is_empty() {
        return Err(SchemaError::TableNotFound {
            table: table.to_string(),
        });
    }

    let mut names = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: String = row.try_get(0).map_err(|e| SchemaError::Query {
            table: table.to_string(),
            source: driver_error(e),
        })?;
        names.push(name);
    }

    debug!(table = %table, columns = names.len(), "Fetched column list");

    ColumnList::new(names).map_err(|source| SchemaError::InvalidColumns {
        table: table.to_string(),
        source,
    })
}
