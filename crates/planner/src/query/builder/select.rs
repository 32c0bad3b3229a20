use crate::query::{
    ast::{
        common::{OrderDir, TableRef},
        select::{FromClause, OrderByExpr, Select},
    },
    ident,
};

#[derive(Debug, Clone)]
pub struct SelectBuilder {
    ast: Select,
}

impl SelectBuilder {
    pub fn new(table: TableRef) -> Self {
        Self {
            ast: Select {
                from: Some(FromClause { table, alias: None }),
                ..Default::default()
            },
        }
    }

    pub fn columns<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.ast.columns = columns.iter().map(|c| ident(c.as_ref())).collect();
        self
    }

    pub fn order_by(mut self, column: &str, direction: Option<OrderDir>) -> Self {
        self.ast.order_by.push(OrderByExpr {
            expr: ident(column),
            direction,
        });
        self
    }

    pub fn build(self) -> Select {
        self.ast
    }
}
