//! Catalog rows and typed field access.
//!
//! A [`Row`] is one record returned by the catalog: an ordered mapping of
//! field name to [`SqlValue`]. Entities never read rows directly; they go
//! through a [`RowReader`], which names the entity being built so that a
//! missing or mistyped field produces a descriptive error.
//!
//! Field policy for every entity constructor:
//! - required fields that are absent or NULL are a `MissingField` error
//! - optional fields that are absent or NULL become `None`
//! - flags that are absent or NULL are `false`
//! - fields the entity does not know about are ignored

use indexmap::IndexMap;

use crate::error::{Result, ScriptError};

/// A dynamically typed scalar from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Binary(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(n) => Some(*n),
            SqlValue::Bool(b) => Some(i64::from(*b)),
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(b) => Some(*b),
            SqlValue::Int(n) => Some(*n != 0),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            SqlValue::Binary(b) => Some(b),
            _ => None,
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(i64::from(value))
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Binary(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// One catalog record, field order preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: IndexMap<String, SqlValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and in-memory catalogs.
    pub fn with(mut self, field: &str, value: impl Into<SqlValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<SqlValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&SqlValue> {
        self.fields.get(field)
    }

    /// Value at a column position, in the order the query selected it.
    pub fn get_index(&self, index: usize) -> Option<&SqlValue> {
        self.fields.get_index(index).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<SqlValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Typed, entity-aware view over a [`Row`].
pub struct RowReader<'a> {
    row: &'a Row,
    entity: &'static str,
}

impl<'a> RowReader<'a> {
    pub fn new(row: &'a Row, entity: &'static str) -> Self {
        Self { row, entity }
    }

    fn value(&self, field: &str) -> Option<&'a SqlValue> {
        self.row.get(field).filter(|v| !v.is_null())
    }

    fn missing(&self, field: &str) -> ScriptError {
        ScriptError::MissingField {
            entity: self.entity,
            field: field.to_string(),
        }
    }

    fn invalid(&self, field: &str, expected: &'static str) -> ScriptError {
        ScriptError::InvalidField {
            entity: self.entity,
            field: field.to_string(),
            expected,
        }
    }

    pub fn string(&self, field: &str) -> Result<String> {
        self.opt_string(field)?.ok_or_else(|| self.missing(field))
    }

    pub fn opt_string(&self, field: &str) -> Result<Option<String>> {
        match self.value(field) {
            None => Ok(None),
            Some(SqlValue::Text(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.invalid(field, "text")),
        }
    }

    pub fn int(&self, field: &str) -> Result<i64> {
        self.opt_int(field)?.ok_or_else(|| self.missing(field))
    }

    pub fn opt_int(&self, field: &str) -> Result<Option<i64>> {
        match self.value(field) {
            None => Ok(None),
            Some(v) => v
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.invalid(field, "an integer")),
        }
    }

    /// Boolean flag; absent or NULL reads as `false`.
    pub fn flag(&self, field: &str) -> Result<bool> {
        Ok(self.opt_flag(field)?.unwrap_or(false))
    }

    pub fn opt_flag(&self, field: &str) -> Result<Option<bool>> {
        match self.value(field) {
            None => Ok(None),
            Some(v) => v
                .as_bool()
                .map(Some)
                .ok_or_else(|| self.invalid(field, "a bit")),
        }
    }

    pub fn opt_bytes(&self, field: &str) -> Result<Option<Vec<u8>>> {
        match self.value(field) {
            None => Ok(None),
            Some(SqlValue::Binary(b)) => Ok(Some(b.clone())),
            Some(_) => Err(self.invalid(field, "binary")),
        }
    }
}
