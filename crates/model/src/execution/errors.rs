use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColumnListError {
    #[error("column list is empty")]
    Empty,

    #[error("column list contains an empty name")]
    EmptyName,

    #[error("column '{0}' appears more than once")]
    Duplicate(String),
}
