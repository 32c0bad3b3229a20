use crate::records::row::Row;

/// A bounded group of rows pulled from the source in one fetch.
///
/// An empty batch is the reader's end-of-stream signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowBatch {
    pub rows: Vec<Row>,
}

impl RowBatch {
    pub fn new(rows: Vec<Row>) -> Self {
        RowBatch { rows }
    }

    pub fn empty() -> Self {
        RowBatch { rows: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }
}

impl From<Vec<Row>> for RowBatch {
    fn from(rows: Vec<Row>) -> Self {
        RowBatch::new(rows)
    }
}
