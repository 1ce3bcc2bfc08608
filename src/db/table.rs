//! Closed set of tables the repository is allowed to touch.
//!
//! Table and column identifiers are interpolated into statement text, so
//! they must only ever come from the descriptors below.

use crate::error::{InsightsError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    /// ISO 8601 `YYYY-MM-DD`, stored as TEXT.
    Date,
    /// Stored as INTEGER 0/1.
    Boolean,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Real => "real",
            ColumnType::Text => "text",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
    /// Heading shown by the viewer.
    pub label: &'static str,
}

const fn col(name: &'static str, ty: ColumnType, label: &'static str) -> Column {
    Column { name, ty, label }
}

const CUSTOMER_COLUMNS: &[Column] = &[
    col("customer_id", ColumnType::Integer, "Customer ID"),
    col("name", ColumnType::Text, "Name"),
    col("email", ColumnType::Text, "Email"),
    col("phone", ColumnType::Text, "Phone"),
    col("location", ColumnType::Text, "Location"),
    col("signup_date", ColumnType::Date, "Signup Date"),
    col("is_premium", ColumnType::Boolean, "Is Premium"),
    col("preferred_cuisine", ColumnType::Text, "Preferred Cuisine"),
    col("total_orders", ColumnType::Integer, "Total Orders"),
    col("average_rating", ColumnType::Real, "Average Rating"),
];

const RESTAURANT_COLUMNS: &[Column] = &[
    col("restaurant_id", ColumnType::Integer, "Restaurant ID"),
    col("name", ColumnType::Text, "Name"),
    col("cuisine_type", ColumnType::Text, "Cuisine Type"),
    col("location", ColumnType::Text, "Location"),
    col("owner_name", ColumnType::Text, "Owner Name"),
    col("average_delivery_time", ColumnType::Real, "Average Delivery Time"),
    col("contact_number", ColumnType::Text, "Contact Number"),
    col("rating", ColumnType::Real, "Rating"),
    col("total_orders", ColumnType::Integer, "Total Orders"),
    col("is_active", ColumnType::Boolean, "Is Active"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Table {
    Customers,
    Restaurants,
}

impl Table {
    pub const ALL: [Table; 2] = [Table::Customers, Table::Restaurants];

    pub fn name(self) -> &'static str {
        match self {
            Table::Customers => "Customers",
            Table::Restaurants => "Restaurants",
        }
    }

    /// Singular entity name, e.g. `Customer`.
    pub fn entity(self) -> &'static str {
        match self {
            Table::Customers => "Customer",
            Table::Restaurants => "Restaurant",
        }
    }

    pub fn primary_key(self) -> &'static str {
        self.columns()[0].name
    }

    /// All columns in schema order, primary key first.
    pub fn columns(self) -> &'static [Column] {
        match self {
            Table::Customers => CUSTOMER_COLUMNS,
            Table::Restaurants => RESTAURANT_COLUMNS,
        }
    }

    pub fn column(self, name: &str) -> Option<&'static Column> {
        self.columns().iter().find(|c| c.name == name)
    }

    /// Like [`Table::column`], but an unknown name is a schema error.
    pub fn require_column(self, name: &str) -> Result<&'static Column> {
        self.column(name).ok_or_else(|| InsightsError::UnknownColumn {
            table: self.name(),
            column: name.to_string(),
        })
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Table::ALL
            .into_iter()
            .find(|t| {
                t.name().eq_ignore_ascii_case(wanted) || t.entity().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| InsightsError::UnknownTable(s.to_string()))
    }
}
