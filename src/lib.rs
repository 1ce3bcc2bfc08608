pub mod cli;
pub mod config;
pub mod db;
pub mod error;

pub use db::{FieldMap, Predicate, Record, Store, Table, Value};
pub use error::{ErrorKind, InsightsError};
