//! Typed cell values, ordered field mappings and rows.

use crate::db::table::{ColumnType, Table};
use crate::error::{InsightsError, Result};
use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Format used for every date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Bool(_) => "boolean",
            Value::Date(_) => "date",
        }
    }

    /// The value to store in a column of type `ty`, or `None` if it does
    /// not fit.
    ///
    /// Integers are accepted by real columns. Text is accepted by date
    /// columns when it parses as a date, and is stored in canonical
    /// `YYYY-MM-DD` form. Non-finite reals are rejected; SQLite would
    /// store NaN as NULL.
    pub fn coerce(&self, ty: ColumnType) -> Option<Value> {
        match (self, ty) {
            (Value::Null, _) => Some(Value::Null),
            (Value::Integer(_), ColumnType::Integer | ColumnType::Real) => Some(self.clone()),
            (Value::Real(v), ColumnType::Real) if v.is_finite() => Some(self.clone()),
            (Value::Text(_), ColumnType::Text) => Some(self.clone()),
            (Value::Text(s), ColumnType::Date) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                .ok()
                .map(Value::Date),
            (Value::Bool(_), ColumnType::Boolean) => Some(self.clone()),
            (Value::Date(_), ColumnType::Date) => Some(self.clone()),
            _ => None,
        }
    }

    pub fn fits(&self, ty: ColumnType) -> bool {
        self.coerce(ty).is_some()
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Column name → value, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, Value)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FieldMap::insert`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set `column`. An existing column keeps its position.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (column, value) in &self.entries {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// One row read back from a table, fields in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    table: Table,
    fields: FieldMap,
}

impl Record {
    pub fn new(table: Table, fields: FieldMap) -> Self {
        Self { table, fields }
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn into_fields(self) -> FieldMap {
        self.fields
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// Primary key of the row.
    pub fn id(&self) -> Option<i64> {
        match self.fields.get(self.table.primary_key()) {
            Some(Value::Integer(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn integer(&self, column: &'static str) -> Result<i64> {
        match self.required(column)? {
            Value::Integer(v) => Ok(*v),
            other => Err(self.unexpected(column, "integer", other)),
        }
    }

    pub fn real(&self, column: &'static str) -> Result<f64> {
        match self.required(column)? {
            Value::Real(v) => Ok(*v),
            Value::Integer(v) => Ok(*v as f64),
            other => Err(self.unexpected(column, "real", other)),
        }
    }

    pub fn text(&self, column: &'static str) -> Result<&str> {
        match self.required(column)? {
            Value::Text(v) => Ok(v),
            other => Err(self.unexpected(column, "text", other)),
        }
    }

    pub fn boolean(&self, column: &'static str) -> Result<bool> {
        match self.required(column)? {
            Value::Bool(v) => Ok(*v),
            other => Err(self.unexpected(column, "boolean", other)),
        }
    }

    pub fn date(&self, column: &'static str) -> Result<NaiveDate> {
        match self.required(column)? {
            Value::Date(v) => Ok(*v),
            other => Err(self.unexpected(column, "date", other)),
        }
    }

    fn required(&self, column: &'static str) -> Result<&Value> {
        match self.fields.get(column) {
            None | Some(Value::Null) => Err(InsightsError::Decode {
                table: self.table.name(),
                column,
                reason: "value is missing".to_string(),
            }),
            Some(v) => Ok(v),
        }
    }

    fn unexpected(&self, column: &'static str, expected: &str, found: &Value) -> InsightsError {
        InsightsError::Decode {
            table: self.table.name(),
            column,
            reason: format!("expected {expected}, found {}", found.type_name()),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
