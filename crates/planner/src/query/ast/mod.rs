pub mod common;
pub mod cursor;
pub mod expr;
pub mod insert;
pub mod select;
