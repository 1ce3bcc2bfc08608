use crate::db::table::Table;
use crate::db::value::Value;
use crate::error::{InsightsError, Result};

/// Conjunction of `column = ?` terms used to select rows for deletion.
///
/// The rendered clause never contains a value; values are handed to the
/// engine as bound parameters in term order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    terms: Vec<(String, Value)>,
}

impl Predicate {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::default().and_eq(column, value)
    }

    pub fn and_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.terms.push((column.into(), value.into()));
        self
    }

    /// The fixed primary-key predicate, `<entity>_id = ?`.
    pub fn by_id(table: Table, id: i64) -> Self {
        Self::eq(table.primary_key(), id)
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Check every column against `table` and render the WHERE clause.
    pub fn render(&self, table: Table) -> Result<(String, Vec<&Value>)> {
        if self.terms.is_empty() {
            return Err(InsightsError::EmptyPredicate(table.name()));
        }
        let mut clauses = Vec::with_capacity(self.terms.len());
        let mut params = Vec::with_capacity(self.terms.len());
        for (column, value) in &self.terms {
            let column = table.require_column(column)?;
            if matches!(value, Value::Null) {
                clauses.push(format!("{} IS NULL", column.name));
            } else {
                clauses.push(format!("{} = ?", column.name));
                params.push(value);
            }
        }
        Ok((clauses.join(" AND "), params))
    }
}
