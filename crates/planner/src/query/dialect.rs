//! Defines the `Dialect` trait for database-specific SQL syntax.

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a table or column name) in the correct
    /// quotation marks for the dialect, escaping embedded quote characters.
    ///
    /// - PostgreSQL uses double quotes: `"my_column"`, `"say ""hi"""`
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the placeholder for a parameterized query.
    ///
    /// - PostgreSQL uses `$1`, `$2`, etc.
    fn get_placeholder(&self, index: usize) -> String;

    /// Upper bound on bind parameters in a single statement.
    fn max_bind_params(&self) -> usize;
}

#[derive(Debug, Clone)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', r#""""#))
    }

    fn get_placeholder(&self, index: usize) -> String {
        // PostgreSQL uses $1, $2, etc.
        format!("${}", index + 1)
    }

    fn max_bind_params(&self) -> usize {
        // Bind message parameter count is an Int16
        u16::MAX as usize
    }
}
