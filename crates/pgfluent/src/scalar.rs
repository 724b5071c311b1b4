//! Scalar bound values.
//!
//! A [`Scalar`] is a single primitive value bound to one `?` placeholder.
//! Composite values (arrays, objects) are deliberately not representable:
//! the fallible conversion from [`serde_json::Value`] rejects them, which is
//! the validation seam used by `insert`/`update`.

use crate::error::{FluentError, FluentResult};
use bytes::BytesMut;
use tokio_postgres::types::{IsNull, ToSql, Type};

/// A scalar value bound to one placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Whether this value is the SQL NULL equivalent.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i16> for Scalar {
    fn from(v: i16) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

impl TryFrom<serde_json::Value> for Scalar {
    type Error = FluentError;

    fn try_from(value: serde_json::Value) -> FluentResult<Self> {
        match value {
            serde_json::Value::Null => Ok(Self::Null),
            serde_json::Value::Bool(b) => Ok(Self::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Float(f))
                } else {
                    Err(FluentError::invalid_value(format!(
                        "number {n} is not representable as a scalar binding"
                    )))
                }
            }
            serde_json::Value::String(s) => Ok(Self::Text(s)),
            serde_json::Value::Array(_) => Err(FluentError::invalid_value(
                "value must be scalar, got an array",
            )),
            serde_json::Value::Object(_) => Err(FluentError::invalid_value(
                "value must be scalar, got an object",
            )),
        }
    }
}

fn is_textual(ty: &Type) -> bool {
    *ty == Type::TEXT
        || *ty == Type::VARCHAR
        || *ty == Type::BPCHAR
        || *ty == Type::NAME
        || *ty == Type::UNKNOWN
}

fn mismatch(value: &Scalar, ty: &Type) -> Box<dyn std::error::Error + Sync + Send> {
    format!("cannot bind {value:?} to a column of type {ty}").into()
}

impl ToSql for Scalar {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Bool(v) => {
                if *ty == Type::BOOL {
                    v.to_sql(ty, out)
                } else if is_textual(ty) {
                    v.to_string().to_sql(ty, out)
                } else {
                    Err(mismatch(self, ty))
                }
            }
            Self::Int(v) => {
                if *ty == Type::INT2 {
                    i16::try_from(*v)?.to_sql(ty, out)
                } else if *ty == Type::INT4 {
                    i32::try_from(*v)?.to_sql(ty, out)
                } else if *ty == Type::INT8 {
                    v.to_sql(ty, out)
                } else if *ty == Type::FLOAT4 {
                    (*v as f32).to_sql(ty, out)
                } else if *ty == Type::FLOAT8 {
                    (*v as f64).to_sql(ty, out)
                } else if is_textual(ty) {
                    v.to_string().to_sql(ty, out)
                } else {
                    Err(mismatch(self, ty))
                }
            }
            Self::Float(v) => {
                if *ty == Type::FLOAT4 {
                    (*v as f32).to_sql(ty, out)
                } else if *ty == Type::FLOAT8 {
                    v.to_sql(ty, out)
                } else if is_textual(ty) {
                    v.to_string().to_sql(ty, out)
                } else {
                    Err(mismatch(self, ty))
                }
            }
            Self::Text(v) => {
                if <String as ToSql>::accepts(ty) {
                    v.to_sql(ty, out)
                } else {
                    Err(mismatch(self, ty))
                }
            }
        }
    }

    fn accepts(_ty: &Type) -> bool {
        // The value variant is only known per instance, so type checking
        // happens in `to_sql` (NULL in particular binds to any type).
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_json_scalars() {
        assert_eq!(Scalar::try_from(json!(null)).unwrap(), Scalar::Null);
        assert_eq!(Scalar::try_from(json!(true)).unwrap(), Scalar::Bool(true));
        assert_eq!(Scalar::try_from(json!(42)).unwrap(), Scalar::Int(42));
        assert_eq!(Scalar::try_from(json!(1.5)).unwrap(), Scalar::Float(1.5));
        assert_eq!(
            Scalar::try_from(json!("abc")).unwrap(),
            Scalar::Text("abc".to_string())
        );
    }

    #[test]
    fn rejects_json_composites() {
        let err = Scalar::try_from(json!([1, 2])).unwrap_err();
        assert!(err.is_invalid_value());

        let err = Scalar::try_from(json!({"a": 1})).unwrap_err();
        assert!(err.is_invalid_value());
    }

    #[test]
    fn converts_native_values() {
        assert_eq!(Scalar::from(5i32), Scalar::Int(5));
        assert_eq!(Scalar::from("x"), Scalar::Text("x".to_string()));
        assert_eq!(Scalar::from(None::<i64>), Scalar::Null);
        assert_eq!(Scalar::from(Some(7i64)), Scalar::Int(7));
    }
}
