//! Insert, update and delete compilation over an ordered [`Record`].

use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use crate::error::SqlWrapperError;
use crate::query::QueryAndParams;
use crate::types::RowValues;

use super::ident::safe_name;
use super::where_clause::{InListMode, WhereSpec, compile_where};

/// Ordered `column -> value` pairs for inserts and updates.
///
/// Setting a column twice replaces the value in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    columns: Vec<(String, RowValues)>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<RowValues>) {
        let column = column.into();
        let value = value.into();
        if let Some(slot) = self.columns.iter_mut().find(|(k, _)| *k == column) {
            slot.1 = value;
        } else {
            self.columns.push((column, value));
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build a record from a JSON object, keeping key order. `null` is the empty record.
    ///
    /// # Errors
    /// Returns `InvalidArgument` when `value` is neither an object nor `null`.
    pub fn from_json(value: &JsonValue) -> Result<Self, SqlWrapperError> {
        match value {
            JsonValue::Null => Ok(Record::new()),
            JsonValue::Object(obj) => Ok(obj
                .iter()
                .map(|(k, v)| (k.clone(), RowValues::from(v.clone())))
                .collect()),
            other => Err(SqlWrapperError::InvalidArgument(format!(
                "record must be an object, got {other}"
            ))),
        }
    }

    // Column names and driver-ready values, in order.
    fn split_bindable(&self) -> (Vec<&str>, Vec<RowValues>) {
        self.columns
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone().into_bindable()))
            .unzip()
    }
}

impl<K: Into<String>, V: Into<RowValues>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        Record::from_json(&value).map_err(serde::de::Error::custom)
    }
}

/// Compile an insert.
///
/// The table name is sanitized but not checked: a name that sanitizes to nothing leaves an
/// empty table token and the statement fails when executed.
#[must_use]
pub fn compile_insert(table: &str, record: &Record) -> QueryAndParams {
    let table = safe_name(table).unwrap_or_default();
    let (columns, params) = record.split_bindable();
    let placeholders = vec!["?"; columns.len()].join(", ");
    QueryAndParams::new(
        format!(
            "insert into {table} ({}) values ({placeholders})",
            columns.join(", ")
        ),
        params,
    )
}

/// Compile an update. Where parameters follow the set parameters.
///
/// # Errors
/// Returns `MissingTable` when the table sanitizes to nothing and `NoFieldsToUpdate` when
/// `changes` is empty, in that order.
pub fn compile_update(
    table: &str,
    changes: &Record,
    filter: Option<&WhereSpec>,
    mode: InListMode,
) -> Result<QueryAndParams, SqlWrapperError> {
    let table = safe_name(table).ok_or(SqlWrapperError::MissingTable {
        operation: "update",
    })?;
    if changes.is_empty() {
        return Err(SqlWrapperError::NoFieldsToUpdate);
    }

    let (columns, mut params) = changes.split_bindable();
    let set = columns
        .iter()
        .map(|c| format!("{c} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    let filter = compile_where(filter, mode);
    params.extend(filter.params);

    Ok(QueryAndParams::new(
        format!("update {table} set {set}{}", filter.fragment),
        params,
    ))
}

/// Compile a delete. Without a filter every row of the table is deleted.
///
/// # Errors
/// Returns `MissingTable` when the table sanitizes to nothing.
pub fn compile_delete(
    table: &str,
    filter: Option<&WhereSpec>,
    mode: InListMode,
) -> Result<QueryAndParams, SqlWrapperError> {
    let table = safe_name(table).ok_or(SqlWrapperError::MissingTable {
        operation: "delete",
    })?;
    let filter = compile_where(filter, mode);
    Ok(QueryAndParams::new(
        format!("delete from {table}{}", filter.fragment),
        filter.params,
    ))
}
