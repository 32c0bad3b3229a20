use bytes::{BufMut, BytesMut};
use model::core::value::Value;
use std::error::Error;
use tokio_postgres::types::{Format, IsNull, ToSql, Type, to_sql_checked};

/// Binds a [`Value`] in the text format, letting the server parse it into
/// whatever type the target column has.
#[derive(Debug)]
pub struct PgTextParam<'a>(pub &'a Value);

impl ToSql for PgTextParam<'_> {
    fn to_sql(&self, _ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self.0 {
            Value::Text(text) => {
                out.put_slice(text.as_bytes());
                Ok(IsNull::No)
            }
            Value::Null => Ok(IsNull::Yes),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    fn encode_format(&self, _ty: &Type) -> Format {
        Format::Text
    }

    to_sql_checked!();
}

pub struct PgParamStore<'a> {
    pub params: Vec<PgTextParam<'a>>,
}

impl<'a> PgParamStore<'a> {
    pub fn from_values(values: &'a [Value]) -> Self {
        Self {
            params: values.iter().map(PgTextParam).collect(),
        }
    }

    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect::<Vec<_>>()
    }
}
