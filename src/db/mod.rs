//! Database module: table descriptors, values, schema and the repository.
//!
//! Layout:
//! - `table.rs`: the closed set of tables and their ordered columns
//! - `value.rs`: typed values, ordered field maps and rows
//! - `predicate.rs`: bound-parameter delete predicates
//! - `schema.rs`: SQL DDL for initializing the database
//! - `models.rs`: typed customers and restaurants
//! - `sqlite.rs`: the connection-per-operation repository

pub mod models;
pub mod predicate;
pub mod schema;
pub mod sqlite;
pub mod table;
pub mod value;

pub use models::{Cuisine, Customer, NewCustomer, NewRestaurant, Restaurant};
pub use predicate::Predicate;
pub use schema::SQLITE_INIT;
pub use sqlite::Store;
pub use table::{Column, ColumnType, Table};
pub use value::{FieldMap, Record, Value};
