//! Engine-level value type.

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// One SQLite storage-class value.
///
/// Serialized untagged, so JSON `null`, numbers, strings and byte arrays map
/// directly onto the matching variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    /// SQLite stores NaN as NULL, so the facade rejects a NaN real with
    /// `DbError::InvalidValue` instead of binding it.
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// Values of one result row, in table column order.
pub type RowValues = Vec<Value>;

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(value) => Some(value.as_slice()),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

// SQLite has no boolean storage class.
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Integer(if value { 1 } else { 0 })
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Blob(value.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self {
            Self::Null => ValueRef::Null,
            Self::Integer(value) => ValueRef::Integer(*value),
            Self::Real(value) => ValueRef::Real(*value),
            Self::Text(value) => ValueRef::Text(value.as_bytes()),
            Self::Blob(value) => ValueRef::Blob(value.as_slice()),
        };
        Ok(ToSqlOutput::Borrowed(value))
    }
}

// Text that is not valid UTF-8 is a conversion error, not a lossy read.
impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(value) => Self::Integer(value),
            ValueRef::Real(value) => Self::Real(value),
            ValueRef::Text(_) => Self::Text(value.as_str()?.to_string()),
            ValueRef::Blob(bytes) => Self::Blob(bytes.to_vec()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Value;
    use rusqlite::Connection;

    #[test]
    fn primitives_convert_to_storage_classes() {
        assert_eq!(Value::from(7_i32), Value::Integer(7));
        assert_eq!(Value::from(true), Value::Integer(1));
        assert_eq!(Value::from(false), Value::Integer(0));
        assert_eq!(Value::from(1.5), Value::Real(1.5));
        assert_eq!(Value::from("Ann"), Value::Text("Ann".to_string()));
        assert_eq!(Value::from(vec![0_u8, 1]), Value::Blob(vec![0, 1]));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }

    #[test]
    fn accessors_match_variant() {
        assert_eq!(Value::Integer(3).as_i64(), Some(3));
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Text("a".into()).as_str(), Some("a"));
        assert_eq!(Value::Text("a".into()).as_i64(), None);
        assert!(Value::Null.is_null());
        assert_eq!(Value::Blob(vec![9]).as_blob(), Some(&[9_u8][..]));
    }

    #[test]
    fn untagged_json_maps_to_variants() {
        let values: Vec<Value> =
            serde_json::from_str(r#"[null, 1, 2.5, "Bo", [1, 2]]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Integer(1),
                Value::Real(2.5),
                Value::Text("Bo".to_string()),
                Value::Blob(vec![1, 2]),
            ]
        );
        assert_eq!(
            serde_json::to_string(&Value::Text("Ann".into())).unwrap(),
            r#""Ann""#
        );
    }

    #[test]
    fn column_values_read_back_by_storage_class() {
        let conn = Connection::open_in_memory().unwrap();
        let row: Vec<Value> = conn
            .query_row("SELECT NULL, 7, 1.5, 'Ann', x'0001'", [], |row| {
                (0..5).map(|index| row.get::<_, Value>(index)).collect()
            })
            .unwrap();
        assert_eq!(
            row,
            vec![
                Value::Null,
                Value::Integer(7),
                Value::Real(1.5),
                Value::Text("Ann".to_string()),
                Value::Blob(vec![0, 1]),
            ]
        );
    }

    #[test]
    fn invalid_utf8_text_is_a_conversion_error() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn
            .query_row("SELECT CAST(x'FFFE' AS TEXT)", [], |row| row.get::<_, Value>(0))
            .unwrap_err();
        assert!(
            matches!(err, rusqlite::Error::FromSqlConversionFailure(0, _, _)),
            "{err:?}"
        );
    }
}
