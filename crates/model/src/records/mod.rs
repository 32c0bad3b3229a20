pub mod batch;
pub mod columns;
pub mod row;
