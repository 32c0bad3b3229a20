//! Defines the core rendering trait and context for converting AST to SQL.

use model::core::value::Value;

use crate::query::{ast::common::TableRef, dialect::Dialect};

pub mod cursor;
pub mod expr;
pub mod insert;
pub mod select;

/// A trait for any AST node that can be rendered into a SQL string.
pub trait Render {
    fn render(&self, renderer: &mut Renderer);
}

/// A context that holds the state during the rendering process.
///
/// It accumulates the SQL string and the parameters, and provides
/// access to the dialect for syntax-specific details.
pub struct Renderer<'a> {
    pub sql: String,
    pub params: Vec<Value>,
    pub dialect: &'a dyn Dialect,
    placeholders: usize,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            dialect,
            placeholders: 0,
        }
    }

    /// Consumes the renderer and returns the final SQL string and parameters.
    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    pub fn add_param(&mut self, value: Value) {
        self.params.push(value);
        self.add_placeholder();
    }

    /// Emits the next placeholder without recording a value.
    pub fn add_placeholder(&mut self) {
        let placeholder = self.dialect.get_placeholder(self.placeholders);
        self.placeholders += 1;
        self.sql.push_str(&placeholder);
    }

    pub fn push_identifier(&mut self, ident: &str) {
        let quoted = self.dialect.quote_identifier(ident);
        self.sql.push_str(&quoted);
    }

    pub fn push_identifier_list(&mut self, idents: &[String]) {
        for (i, ident) in idents.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.push_identifier(ident);
        }
    }

    pub fn render_table_ref(&mut self, table: &TableRef) {
        if let Some(schema) = &table.schema {
            self.push_identifier(schema);
            self.sql.push('.');
        }
        self.push_identifier(&table.name);
    }
}
