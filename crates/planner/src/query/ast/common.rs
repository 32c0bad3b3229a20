//! Building blocks shared by several statement types.

/// A possibly schema-qualified table name, unquoted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

impl From<&model::core::identifiers::TableRef> for TableRef {
    fn from(table: &model::core::identifiers::TableRef) -> Self {
        TableRef {
            schema: Some(table.schema.clone()),
            name: table.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDir {
    Asc,
    Desc,
}
