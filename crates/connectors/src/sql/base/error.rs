use model::execution::errors::ColumnListError;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures while opening, checking or closing a database session.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// A required connection parameter is absent or empty.
    #[error("missing required connection field `{0}`")]
    MissingField(&'static str),

    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: BoxError,
    },

    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("connection check failed on {endpoint}: {source}")]
    Ping {
        endpoint: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to close session on {endpoint}: {source}")]
    Close {
        endpoint: String,
        #[source]
        source: BoxError,
    },
}

/// Failures while discovering a table's columns.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The catalog lookup returned no columns.
    #[error("table {table} not found or has no columns")]
    TableNotFound { table: String },

    #[error("catalog query for {table} failed: {source}")]
    Query {
        table: String,
        #[source]
        source: BoxError,
    },

    #[error("invalid column list for {table}: {source}")]
    InvalidColumns {
        table: String,
        #[source]
        source: ColumnListError,
    },

    /// Columns read from the source are absent in the target table.
    #[error("target table {table} is missing columns: {}", missing.join(", "))]
    ColumnMismatch { table: String, missing: Vec<String> },
}

/// Failures of the streaming read. Always fatal to the run.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to open read stream on {table}: {source}")]
    Open {
        table: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to fetch rows from {table}: {source}")]
    Fetch {
        table: String,
        #[source]
        source: BoxError,
    },

    #[error("read stream is not open")]
    NotOpen,

    #[error("row from {table} has {found} values, expected {expected}")]
    Shape {
        table: String,
        expected: usize,
        found: usize,
    },

    #[error("failed to close read stream: {0}")]
    Close(#[source] BoxError),
}

/// Failures of one batch write. The batch is rolled back before this is
/// returned.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to begin transaction on {table}: {source}")]
    Begin {
        table: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to prepare insert into {table}: {source}")]
    Prepare {
        table: String,
        #[source]
        source: BoxError,
    },

    /// `row` is the 1-based position of the rejected row in its batch, or of
    /// the first row of the rejected statement in multi-row mode.
    #[error("insert into {table} failed at row {row}: {source}")]
    Insert {
        table: String,
        row: usize,
        #[source]
        source: BoxError,
    },

    #[error("commit on {table} failed: {source}")]
    Commit {
        table: String,
        #[source]
        source: BoxError,
    },

    #[error("row {row} has {found} values, expected {expected}")]
    RowShape {
        row: usize,
        expected: usize,
        found: usize,
    },
}
