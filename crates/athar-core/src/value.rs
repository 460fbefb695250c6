//! Bound values and rows for parameterized DML

use crate::ident::Ident;
use serde::Serialize;
use std::fmt;

/// A value bound to a `?` placeholder. Values never appear in SQL text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
}

impl SqlValue {
    /// Whether the value is SQL `NULL`
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Integer view of the value, if it is one
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Bool(b) => write!(f, "{b}"),
            SqlValue::Int(i) => write!(f, "{i}"),
            SqlValue::Text(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(i64::from(v))
    }
}

impl From<u64> for SqlValue {
    fn from(v: u64) -> Self {
        // Auto-increment ids stay far below i64::MAX.
        SqlValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// An ordered set of column/value pairs destined for one `INSERT`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Row {
    columns: Vec<Ident>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter. A repeated column replaces the earlier value.
    pub fn with(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.set(Ident::new(column), value.into());
        self
    }

    /// Set a column value
    pub fn set(&mut self, column: Ident, value: SqlValue) {
        if let Some(pos) = self.columns.iter().position(|c| *c == column) {
            self.values[pos] = value;
        } else {
            self.columns.push(column);
            self.values.push(value);
        }
    }

    /// Look up the value for a column
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|pos| &self.values[pos])
    }

    /// Column names in insertion order
    pub fn columns(&self) -> &[Ident] {
        &self.columns
    }

    /// Values in insertion order
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Iterate over `(column, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&Ident, &SqlValue)> {
        self.columns.iter().zip(self.values.iter())
    }

    /// Project the row onto `columns`, producing equality filters.
    ///
    /// Missing columns project to `NULL`.
    pub fn key(&self, columns: &[Ident]) -> Vec<(Ident, SqlValue)> {
        columns
            .iter()
            .map(|c| (c.clone(), self.get(c).cloned().unwrap_or(SqlValue::Null)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
