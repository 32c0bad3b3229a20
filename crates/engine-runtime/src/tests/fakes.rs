//! In-memory stand-ins for a database server, with knobs for injecting
//! failures and counters for asserting on what the engine did.

use async_trait::async_trait;
use connectors::sql::base::{
    error::{ConnectionError, ReadError, SchemaError, WriteError},
    provider::ConnectionProvider,
    session::{
        BatchReader, BatchWriter, SchemaIntrospector, Session, SourceSession, TargetSession,
    },
};
use model::{
    core::{identifiers::TableRef, value::Value},
    execution::{connection::ConnectionConfig, job::InsertMode},
    records::{batch::RowBatch, columns::ColumnList, row::Row},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

fn failure(message: &str) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::other(message.to_string()))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DbStats {
    pub sessions_opened: usize,
    pub sessions_closed: usize,
    pub column_lookups: usize,
    pub streams_opened: usize,
    pub streams_closed: usize,
    pub fetches: usize,
    pub commits: usize,
    pub rollbacks: usize,
}

#[derive(Default)]
struct FakeTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

#[derive(Default)]
struct DbState {
    tables: HashMap<TableRef, FakeTable>,
    rejections: Vec<(TableRef, String, Value)>,
    fail_fetch_at: Option<usize>,
    fail_close: bool,
    stats: DbStats,
}

#[derive(Default)]
pub struct FakeDb {
    state: Mutex<DbState>,
}

impl FakeDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(self, table: &TableRef, columns: &[&str], rows: Vec<Row>) -> Self {
        self.lock().tables.insert(
            table.clone(),
            FakeTable {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows,
            },
        );
        self
    }

    /// Inserts into `table` fail whenever `column` holds `value`, like a
    /// check constraint.
    pub fn reject(self, table: &TableRef, column: &str, value: Value) -> Self {
        self.lock()
            .rejections
            .push((table.clone(), column.to_string(), value));
        self
    }

    /// The `n`th fetch (1-based) fails.
    pub fn fail_fetch_at(self, n: usize) -> Self {
        self.lock().fail_fetch_at = Some(n);
        self
    }

    pub fn fail_close(self) -> Self {
        self.lock().fail_close = true;
        self
    }

    pub fn rows(&self, table: &TableRef) -> Vec<Row> {
        self.lock()
            .tables
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> DbStats {
        self.lock().stats
    }

    fn lock(&self) -> MutexGuard<'_, DbState> {
        self.state.lock().unwrap()
    }
}

pub fn rows_n(n: usize) -> Vec<Row> {
    (1..=n as i64)
        .map(|i| Row::new(vec![Value::from(i), Value::text(format!("name-{i}")), Value::from(i * 10)]))
        .collect()
}

struct Stream {
    table: TableRef,
    rows: Vec<Row>,
    position: usize,
}

pub struct FakeSession {
    db: Arc<FakeDb>,
    endpoint: String,
    stream: Option<Stream>,
}

#[async_trait]
impl Session for FakeSession {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn ping(&mut self) -> Result<(), ConnectionError> {
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), ConnectionError> {
        let mut state = self.db.lock();
        state.stats.sessions_closed += 1;
        if self.stream.is_some() {
            state.stats.streams_closed += 1;
        }
        if state.fail_close {
            return Err(ConnectionError::Close {
                endpoint: self.endpoint.clone(),
                source: failure("connection reset"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SchemaIntrospector for FakeSession {
    async fn column_list(&mut self, table: &TableRef) -> Result<ColumnList, SchemaError> {
        let mut state = self.db.lock();
        state.stats.column_lookups += 1;
        let columns = state
            .tables
            .get(table)
            .map(|t| t.columns.clone())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| SchemaError::TableNotFound {
                table: table.to_string(),
            })?;
        ColumnList::new(columns).map_err(|source| SchemaError::InvalidColumns {
            table: table.to_string(),
            source,
        })
    }
}

#[async_trait]
impl BatchReader for FakeSession {
    async fn open_stream(
        &mut self,
        table: &TableRef,
        columns: &ColumnList,
        order_by: &[String],
    ) -> Result<(), ReadError> {
        let mut state = self.db.lock();
        let source = state.tables.get(table).ok_or_else(|| ReadError::Open {
            table: table.to_string(),
            source: failure("relation does not exist"),
        })?;

        let mut indexes = Vec::with_capacity(columns.len());
        for name in columns.iter() {
            let idx = source.columns.iter().position(|c| c == name).ok_or_else(|| {
                ReadError::Open {
                    table: table.to_string(),
                    source: failure(&format!("column {name} does not exist")),
                }
            })?;
            indexes.push(idx);
        }

        let mut rows: Vec<Row> = source
            .rows
            .iter()
            .map(|row| Row::new(indexes.iter().map(|&i| row.values()[i].clone()).collect()))
            .collect();

        for key in order_by.iter().rev() {
            let Some(idx) = columns.iter().position(|c| c == key.as_str()) else {
                return Err(ReadError::Open {
                    table: table.to_string(),
                    source: failure(&format!("column {key} does not exist")),
                });
            };
            rows.sort_by(|a, b| a.values()[idx].as_str().cmp(&b.values()[idx].as_str()));
        }

        state.stats.streams_opened += 1;
        drop(state);
        self.stream = Some(Stream {
            table: table.clone(),
            rows,
            position: 0,
        });
        Ok(())
    }

    async fn next_batch(&mut self, max_rows: usize) -> Result<RowBatch, ReadError> {
        let stream = self.stream.as_mut().ok_or(ReadError::NotOpen)?;
        let mut state = self.db.lock();
        state.stats.fetches += 1;
        if state.fail_fetch_at == Some(state.stats.fetches) {
            return Err(ReadError::Fetch {
                table: stream.table.to_string(),
                source: failure("server closed the connection unexpectedly"),
            });
        }

        let end = (stream.position + max_rows).min(stream.rows.len());
        let rows = stream.rows[stream.position..end].to_vec();
        stream.position = end;
        Ok(RowBatch::new(rows))
    }

    async fn close_stream(&mut self) -> Result<(), ReadError> {
        if self.stream.take().is_some() {
            self.db.lock().stats.streams_closed += 1;
        }
        Ok(())
    }
}

#[async_trait]
impl BatchWriter for FakeSession {
    async fn write_batch(
        &mut self,
        table: &TableRef,
        columns: &ColumnList,
        batch: &RowBatch,
    ) -> Result<(), WriteError> {
        let mut state = self.db.lock();
        let DbState {
            tables,
            rejections,
            stats,
            ..
        } = &mut *state;

        let Some(target) = tables.get_mut(table) else {
            return Err(WriteError::Begin {
                table: table.to_string(),
                source: failure("relation does not exist"),
            });
        };

        let mut pending = Vec::with_capacity(batch.len());
        for (i, row) in batch.iter().enumerate() {
            let insert_error = |message: String| WriteError::Insert {
                table: table.to_string(),
                row: i + 1,
                source: failure(&message),
            };

            let mut full = vec![Value::Null; target.columns.len()];
            for (name, value) in columns.iter().zip(row.values()) {
                let Some(idx) = target.columns.iter().position(|c| c == name) else {
                    stats.rollbacks += 1;
                    return Err(insert_error(format!("column \"{name}\" does not exist")));
                };
                full[idx] = value.clone();
            }

            let violated = rejections.iter().any(|(t, column, value)| {
                t == table
                    && target
                        .columns
                        .iter()
                        .position(|c| c == column)
                        .is_some_and(|idx| full[idx] == *value)
            });
            if violated {
                stats.rollbacks += 1;
                return Err(insert_error("new row violates check constraint".to_string()));
            }

            pending.push(Row::new(full));
        }

        target.rows.extend(pending);
        stats.commits += 1;
        Ok(())
    }
}

/// Hands out sessions over two fake servers.
pub struct FakeProvider {
    pub source: Arc<FakeDb>,
    pub target: Arc<FakeDb>,
    fail_source: bool,
    fail_target: bool,
}

impl FakeProvider {
    pub fn new(source: FakeDb, target: FakeDb) -> Self {
        Self {
            source: Arc::new(source),
            target: Arc::new(target),
            fail_source: false,
            fail_target: false,
        }
    }

    pub fn failing_source(mut self) -> Self {
        self.fail_source = true;
        self
    }

    pub fn failing_target(mut self) -> Self {
        self.fail_target = true;
        self
    }

    fn open(
        &self,
        db: &Arc<FakeDb>,
        fail: bool,
        config: &ConnectionConfig,
    ) -> Result<FakeSession, ConnectionError> {
        if fail {
            return Err(ConnectionError::Connect {
                endpoint: config.endpoint(),
                source: failure("connection refused"),
            });
        }
        db.lock().stats.sessions_opened += 1;
        Ok(FakeSession {
            db: db.clone(),
            endpoint: config.endpoint(),
            stream: None,
        })
    }
}

#[async_trait]
impl ConnectionProvider for FakeProvider {
    async fn open_source(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Box<dyn SourceSession>, ConnectionError> {
        Ok(Box::new(self.open(&self.source, self.fail_source, config)?))
    }

    async fn open_target(
        &self,
        config: &ConnectionConfig,
        _insert_mode: InsertMode,
    ) -> Result<Box<dyn TargetSession>, ConnectionError> {
        Ok(Box::new(self.open(&self.target, self.fail_target, config)?))
    }
}
