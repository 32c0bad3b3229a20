//! Turns table/column descriptions into the exact statements the connectors
//! send. Every identifier goes through the dialect's quoting and every value
//! is bound.

use model::{
    core::{identifiers::TableRef, value::Value},
    records::{columns::ColumnList, row::Row},
};

use crate::query::{
    ast::{
        common::TableRef as AstTableRef,
        cursor::{CloseCursor, DeclareCursor, FetchForward},
        select::Select,
    },
    builder::{insert::InsertBuilder, select::SelectBuilder},
    dialect::Dialect,
    renderer::{Render, Renderer},
};

pub struct QueryGenerator<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> QueryGenerator<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    fn render(&self, node: &dyn Render) -> (String, Vec<Value>) {
        let mut renderer = Renderer::new(self.dialect);
        node.render(&mut renderer);
        renderer.finish()
    }

    /// `SELECT <cols> FROM <table> [ORDER BY <keys>]`
    fn select(table: &TableRef, columns: &ColumnList, order_by: &[String]) -> Select {
        order_by
            .iter()
            .fold(
                SelectBuilder::new(AstTableRef::from(table)).columns(columns.names()),
                |builder, key| builder.order_by(key, None),
            )
            .build()
    }

    pub fn declare_cursor(
        &self,
        name: &str,
        table: &TableRef,
        columns: &ColumnList,
        order_by: &[String],
    ) -> String {
        let declare = DeclareCursor {
            name: name.to_string(),
            query: Self::select(table, columns, order_by),
        };
        self.render(&declare).0
    }

    pub fn fetch_forward(&self, name: &str, count: usize) -> String {
        self.render(&FetchForward {
            name: name.to_string(),
            count,
        })
        .0
    }

    pub fn close_cursor(&self, name: &str) -> String {
        self.render(&CloseCursor {
            name: name.to_string(),
        })
        .0
    }

    /// Single-row insert with one placeholder per column, for preparing once.
    pub fn insert_row_template(&self, table: &TableRef, columns: &ColumnList) -> String {
        let insert = InsertBuilder::new(AstTableRef::from(table))
            .columns(columns.names())
            .placeholder_row()
            .build();
        self.render(&insert).0
    }

    /// Multi-row inserts covering `rows`, split so that no statement exceeds
    /// the dialect's bind parameter limit.
    pub fn insert_rows(
        &self,
        table: &TableRef,
        columns: &ColumnList,
        rows: &[Row],
    ) -> Vec<(String, Vec<Value>)> {
        let per_statement = self.rows_per_statement(columns.len());
        rows.chunks(per_statement)
            .map(|chunk| {
                let insert = chunk
                    .iter()
                    .fold(
                        InsertBuilder::new(AstTableRef::from(table)).columns(columns.names()),
                        |builder, row| builder.row(row),
                    )
                    .build();
                self.render(&insert)
            })
            .collect()
    }

    pub fn rows_per_statement(&self, column_count: usize) -> usize {
        (self.dialect.max_bind_params() / column_count.max(1)).max(1)
    }
}

#[cfg(test)]
mod tests {
    use model::{
        core::{identifiers::TableRef, value::Value},
        records::{columns::ColumnList, row::Row},
    };

    use super::QueryGenerator;
    use crate::query::dialect::Postgres;

    fn columns(names: &[&str]) -> ColumnList {
        ColumnList::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_declare_cursor_keeps_column_order() {
        let generator = QueryGenerator::new(&Postgres);
        let sql = generator.declare_cursor(
            "c0",
            &TableRef::new("public", "orders"),
            &columns(&["id", "Customer", "total"]),
            &[],
        );
        assert_eq!(
            sql,
            r#"DECLARE "c0" NO SCROLL CURSOR FOR SELECT "id", "Customer", "total" FROM "public"."orders""#
        );
    }

    #[test]
    fn test_declare_cursor_with_order_by() {
        let generator = QueryGenerator::new(&Postgres);
        let sql = generator.declare_cursor(
            "c1",
            &TableRef::new("public", "orders"),
            &columns(&["id", "total"]),
            &["id".to_string()],
        );
        assert_eq!(
            sql,
            r#"DECLARE "c1" NO SCROLL CURSOR FOR SELECT "id", "total" FROM "public"."orders" ORDER BY "id""#
        );
    }

    #[test]
    fn test_insert_rows_chunks_under_bind_limit() {
        let generator = QueryGenerator::new(&Postgres);
        let cols = columns(&["a", "b", "c"]);
        assert_eq!(generator.rows_per_statement(3), 21845);

        let rows: Vec<Row> = (0..21846i64)
            .map(|i| Row::new(vec![Value::from(i), Value::Null, Value::text("x")]))
            .collect();
        let statements = generator.insert_rows(&TableRef::new("s", "t"), &cols, &rows);

        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].1.len(), 21845 * 3);
        assert_eq!(statements[1].1.len(), 3);
        assert!(statements[1].0.ends_with("VALUES ($1, $2, $3)"));
    }

    #[test]
    fn test_insert_row_template() {
        let generator = QueryGenerator::new(&Postgres);
        let sql = generator.insert_row_template(&TableRef::new("s", "t"), &columns(&["a", "b"]));
        assert_eq!(sql, r#"INSERT INTO "s"."t" ("a", "b") VALUES ($1, $2)"#);
    }
}
