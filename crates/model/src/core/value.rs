use serde::{Deserialize, Serialize};

/// A single column value as exchanged with the database.
///
/// Values travel in the server's text representation: whatever the column
/// type, the source renders it as text and the target parses it back, so no
/// client-side type coercion happens between the two tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Value {
    Text(String),
    Null,
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            Value::Null => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        // Postgres' canonical boolean output
        Value::Text(if value { "t" } else { "f" }.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::Value;

    #[test]
    fn test_conversions_keep_text_form() {
        assert_eq!(Value::from(42i64), Value::text("42"));
        assert_eq!(Value::from(true), Value::text("t"));
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert_eq!(Value::from(Some("x")).as_str(), Some("x"));
    }
}
