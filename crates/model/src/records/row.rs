use crate::core::value::Value;
use serde::{Deserialize, Serialize};

/// One tuple, positionally aligned with the job's column list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Row { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::new(values)
    }
}

/// Builds a [`Row`] from heterogeneous literals, e.g. `row![1, "a", None::<&str>]`.
#[macro_export]
macro_rules! row {
    ($($val:expr),* $(,)?) => {
        $crate::records::row::Row::new(vec![$($crate::core::value::Value::from($val)),*])
    };
}
