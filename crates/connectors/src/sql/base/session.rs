//! Capabilities a database session offers to the transfer engine.
//!
//! The orchestrator only ever sees these traits, so an in-memory
//! implementation can stand in for a real server in tests.

use crate::sql::base::error::{ConnectionError, ReadError, SchemaError, WriteError};
use async_trait::async_trait;
use model::{
    core::identifiers::TableRef,
    records::{batch::RowBatch, columns::ColumnList},
};

#[async_trait]
pub trait Session: Send {
    /// Loggable description of the peer, never containing credentials.
    fn endpoint(&self) -> &str;

    /// Round-trips a trivial statement.
    async fn ping(&mut self) -> Result<(), ConnectionError>;

    /// Ends the session. Open streams and transactions are abandoned.
    async fn close(self: Box<Self>) -> Result<(), ConnectionError>;
}

#[async_trait]
pub trait SchemaIntrospector: Send {
    /// Column names of `table` in ordinal order, exact-match lookup.
    async fn column_list(&mut self, table: &TableRef) -> Result<ColumnList, SchemaError>;
}

#[async_trait]
pub trait BatchReader: Send {
    /// Starts one forward-only select over `columns` of `table`.
    async fn open_stream(
        &mut self,
        table: &TableRef,
        columns: &ColumnList,
        order_by: &[String],
    ) -> Result<(), ReadError>;

    /// Up to `max_rows` rows. An empty batch means the stream is exhausted.
    async fn next_batch(&mut self, max_rows: usize) -> Result<RowBatch, ReadError>;

    async fn close_stream(&mut self) -> Result<(), ReadError>;
}

#[async_trait]
pub trait BatchWriter: Send {
    /// Inserts every row of `batch` in one transaction, all or nothing.
    async fn write_batch(
        &mut self,
        table: &TableRef,
        columns: &ColumnList,
        batch: &RowBatch,
    ) -> Result<(), WriteError>;
}

pub trait SourceSession: Session + SchemaIntrospector + BatchReader {}

impl<T: Session + SchemaIntrospector + BatchReader> SourceSession for T {}

pub trait TargetSession: Session + SchemaIntrospector + BatchWriter {}

impl<T: Session + SchemaIntrospector + BatchWriter> TargetSession for T {}
