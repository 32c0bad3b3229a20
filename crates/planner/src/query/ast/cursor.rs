//! Server-side cursor statements used to stream a table in bounded chunks.

use crate::query::ast::select::Select;

/// `DECLARE <name> NO SCROLL CURSOR FOR <query>`
#[derive(Debug, Clone, PartialEq)]
pub struct DeclareCursor {
    pub name: String,
    pub query: Select,
}

/// `FETCH FORWARD <count> FROM <name>`
#[derive(Debug, Clone, PartialEq)]
pub struct FetchForward {
    pub name: String,
    pub count: usize,
}

/// `CLOSE <name>`
#[derive(Debug, Clone, PartialEq)]
pub struct CloseCursor {
    pub name: String,
}
