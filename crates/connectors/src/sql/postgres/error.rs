//! Readable text for driver failures.
//!
//! `tokio_postgres::Error` displays only its kind (`db error`); the server's
//! message, detail and constraint sit behind `as_db_error()`.

use crate::sql::base::error::BoxError;
use std::error::Error;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{message}")]
pub struct PgDriverError {
    message: String,
    #[source]
    source: tokio_postgres::Error,
}

impl From<tokio_postgres::Error> for PgDriverError {
    fn from(source: tokio_postgres::Error) -> Self {
        let message = match source.as_db_error() {
            Some(db) => {
                let mut message = format!("{}: {}", db.severity(), db.message());
                if let Some(detail) = db.detail() {
                    message.push_str(&format!(" (detail: {detail})"));
                }
                if let Some(constraint) = db.constraint() {
                    message.push_str(&format!(" (constraint: {constraint})"));
                }
                message
            }
            None => error_chain(&source),
        };
        Self { message, source }
    }
}

/// Boxes a driver error keeping the server text in its `Display`.
pub(crate) fn driver_error(error: tokio_postgres::Error) -> BoxError {
    Box::new(PgDriverError::from(error))
}

/// `outer: inner: ...` down the `source()` chain.
pub(crate) fn error_chain(error: &dyn Error) -> String {
    let mut text = error.to_string();
    let mut current = error.source();
    while let Some(cause) = current {
        let cause_text = cause.to_string();
        if !text.ends_with(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        current = cause.source();
    }
    text
}
