//! Result rows and their conversion into typed objects

use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::{Object, Value, ValueParseError};

/// One row of a raw result: column name → column text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultRow {
    columns: BTreeMap<String, String>,
}

impl ResultRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column; the first value set for a name is kept
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.columns.entry(name.into()).or_insert_with(|| value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.columns.get(name).map(|s| s.as_str())
    }

    /// Columns in name order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResultRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = ResultRow::new();
        for (name, value) in iter {
            row.set(name, value);
        }
        row
    }
}

/// Rows in the order the row source produced them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    rows: Vec<ResultRow>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    pub fn first(&self) -> Option<&ResultRow> {
        self.rows.first()
    }

    pub fn get(&self, index: usize) -> Option<&ResultRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter()
    }
}

impl FromIterator<ResultRow> for ResultSet {
    fn from_iter<I: IntoIterator<Item = ResultRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ResultRow;
    type IntoIter = std::slice::Iter<'a, ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Errors that can occur while applying a result row
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarshalError {
    #[error("no scalar member for result column '{column}'")]
    UnknownColumn { column: String },

    #[error("invalid value for result column '{column}': {source}")]
    InvalidValue {
        column: String,
        #[source]
        source: ValueParseError,
    },
}

/// A result target that accepts columns by name
pub trait Marshal {
    fn set_plain(&mut self, name: &str, raw: &str) -> Result<(), MarshalError>;
}

/// Columns must match an existing scalar member and are read as its kind
impl Marshal for Object {
    fn set_plain(&mut self, name: &str, raw: &str) -> Result<(), MarshalError> {
        let slot = self
            .get_plain_mut(name)
            .ok_or_else(|| MarshalError::UnknownColumn {
                column: name.to_string(),
            })?;
        *slot = Value::parse(slot.kind(), raw).map_err(|source| MarshalError::InvalidValue {
            column: name.to_string(),
            source,
        })?;
        Ok(())
    }
}

/// Apply every column of `row` to `out`
///
/// Stops at the first failing column; columns before it (in name order) stay
/// applied.
pub fn marshal_one<T: Marshal + ?Sized>(row: &ResultRow, out: &mut T) -> Result<(), MarshalError> {
    for (name, value) in row.columns() {
        out.set_plain(name, value).map_err(|e| {
            tracing::debug!(column = name, error = %e, "marshal failed");
            e
        })?;
    }
    Ok(())
}

/// Build one default `T` per row
pub fn marshal_many<T: Marshal + Default>(rows: &ResultSet) -> Result<Vec<T>, MarshalError> {
    marshal_many_with(rows, T::default)
}

/// Build one `T` per row, starting each from `make()`
///
/// A failure on any row discards every row built so far.
pub fn marshal_many_with<T, F>(rows: &ResultSet, mut make: F) -> Result<Vec<T>, MarshalError>
where
    T: Marshal,
    F: FnMut() -> T,
{
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let mut item = make();
        marshal_one(row, &mut item)?;
        out.push(item);
    }
    Ok(out)
}

/// Executes rendered SQL and fills a result set
///
/// The return code is positive on success (the number of rows), zero when
/// there is no data and negative on failure.
pub trait RowSource {
    fn fetch(&self, sql: &str, rows: &mut ResultSet) -> i32;
}

impl<F> RowSource for F
where
    F: Fn(&str, &mut ResultSet) -> i32,
{
    fn fetch(&self, sql: &str, rows: &mut ResultSet) -> i32 {
        self(sql, rows)
    }
}
