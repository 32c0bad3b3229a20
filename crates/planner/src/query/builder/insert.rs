use model::records::row::Row;

use crate::query::ast::{common::TableRef, expr::Expr, insert::Insert};

#[derive(Debug, Clone)]
pub struct InsertBuilder {
    ast: Insert,
}

impl InsertBuilder {
    pub fn new(table: TableRef) -> Self {
        Self {
            ast: Insert {
                table,
                ..Default::default()
            },
        }
    }

    pub fn columns<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.ast.columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    /// Adds one row of bound values.
    pub fn row(mut self, row: &Row) -> Self {
        self.ast
            .values
            .push(row.values().iter().cloned().map(Expr::Value).collect());
        self
    }

    /// Adds one row of bare placeholders, one per column.
    pub fn placeholder_row(mut self) -> Self {
        self.ast
            .values
            .push(vec![Expr::Placeholder; self.ast.columns.len()]);
        self
    }

    pub fn build(self) -> Insert {
        self.ast
    }
}
