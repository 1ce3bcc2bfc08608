use crate::db::models::{Customer, NewCustomer, NewRestaurant, Restaurant};
use crate::db::predicate::Predicate;
use crate::db::schema::init_statements;
use crate::db::table::{Column, ColumnType, Table};
use crate::db::value::{FieldMap, Record, Value};
use crate::error::{InsightsError, Result};
use chrono::NaiveDate;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{ConnectOptions, Connection, Row, Sqlite};
use std::str::FromStr;
use tracing::{debug, info, warn};

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Generic repository over the fixed insights tables.
///
/// Holds connection options only: every operation opens its own
/// connection, runs a single autocommitted statement and closes the
/// connection again, whether the statement succeeded or not.
#[derive(Clone, Debug)]
pub struct Store {
    options: SqliteConnectOptions,
}

impl Store {
    pub fn new(options: SqliteConnectOptions) -> Self {
        Self { options }
    }

    /// Parse a `sqlite:` URL; the database file is created on first connect.
    pub fn from_url(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(InsightsError::Startup)?
            .create_if_missing(true);
        Ok(Self::new(options))
    }

    /// [`Store::from_url`] followed by [`Store::init_schema`].
    pub async fn open(database_url: &str) -> Result<Self> {
        let store = Self::from_url(database_url)?;
        store.init_schema().await?;
        Ok(store)
    }

    pub fn options(&self) -> &SqliteConnectOptions {
        &self.options
    }

    /// Create any missing table. Existing tables and rows are left alone.
    pub async fn init_schema(&self) -> Result<()> {
        let mut conn = self
            .options
            .connect()
            .await
            .map_err(InsightsError::Startup)?;
        let mut outcome = Ok(());
        for stmt in init_statements() {
            if let Err(e) = sqlx::query(stmt).execute(&mut conn).await {
                outcome = Err(InsightsError::Startup(e));
                break;
            }
        }
        release(conn).await;
        outcome?;
        debug!(tables = Table::ALL.len(), "schema ready");
        Ok(())
    }

    /// Insert one row built from `fields`, in the mapping's column order.
    /// Returns the rowid the store assigned (or the explicit key supplied).
    pub async fn create_entry(&self, table: Table, fields: &FieldMap) -> Result<i64> {
        if fields.is_empty() {
            return Err(InsightsError::EmptyInsert(table.name()));
        }
        let mut columns = Vec::with_capacity(fields.len());
        let mut values = Vec::with_capacity(fields.len());
        for (name, value) in fields.iter() {
            let column = table.require_column(name)?;
            values.push(coerce(table, column, value)?);
            columns.push(column.name);
        }

        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.name(),
            columns.join(", "),
            placeholders
        );
        debug!(table = %table, sql = %sql, "create_entry");

        let query = values.iter().fold(sqlx::query(&sql), bind_value);
        let mut conn = self.acquire().await?;
        let outcome = query.execute(&mut conn).await;
        release(conn).await;

        let done = outcome.map_err(InsightsError::from_statement)?;
        let id = done.last_insert_rowid();
        info!(table = %table, id, "entry created");
        Ok(id)
    }

    /// Every row of `table`, in whatever order the engine yields them.
    pub async fn read_entries(&self, table: Table) -> Result<Vec<Record>> {
        let columns: Vec<&str> = table.columns().iter().map(|c| c.name).collect();
        let sql = format!("SELECT {} FROM {}", columns.join(", "), table.name());
        debug!(table = %table, sql = %sql, "read_entries");

        let mut conn = self.acquire().await?;
        let outcome = sqlx::query(&sql).fetch_all(&mut conn).await;
        release(conn).await;

        let rows = outcome.map_err(InsightsError::from_statement)?;
        debug!(table = %table, rows = rows.len(), "entries read");
        rows.iter().map(|row| row_to_record(table, row)).collect()
    }

    /// Delete the rows of `table` matching `predicate`. Returns how many went.
    pub async fn delete_entry(&self, table: Table, predicate: &Predicate) -> Result<u64> {
        let (clause, params) = predicate.render(table)?;
        let sql = format!("DELETE FROM {} WHERE {}", table.name(), clause);
        debug!(table = %table, sql = %sql, "delete_entry");

        let query = params.into_iter().fold(sqlx::query(&sql), bind_value);
        let mut conn = self.acquire().await?;
        let outcome = query.execute(&mut conn).await;
        release(conn).await;

        let removed = outcome
            .map_err(InsightsError::from_statement)?
            .rows_affected();
        info!(table = %table, removed, "entries deleted");
        Ok(removed)
    }

    pub async fn delete_by_id(&self, table: Table, id: i64) -> Result<u64> {
        self.delete_entry(table, &Predicate::by_id(table, id)).await
    }

    pub async fn add_customer(&self, customer: &NewCustomer) -> Result<i64> {
        customer.validate()?;
        self.create_entry(Table::Customers, &customer.to_fields())
            .await
    }

    pub async fn add_restaurant(&self, restaurant: &NewRestaurant) -> Result<i64> {
        restaurant.validate()?;
        self.create_entry(Table::Restaurants, &restaurant.to_fields())
            .await
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.read_entries(Table::Customers)
            .await?
            .into_iter()
            .map(Customer::try_from)
            .collect()
    }

    pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>> {
        self.read_entries(Table::Restaurants)
            .await?
            .into_iter()
            .map(Restaurant::try_from)
            .collect()
    }

    async fn acquire(&self) -> Result<SqliteConnection> {
        self.options
            .connect()
            .await
            .map_err(InsightsError::DatabaseError)
    }
}

async fn release(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "failed to close sqlite connection cleanly");
    }
}

fn coerce(table: Table, column: &'static Column, value: &Value) -> Result<Value> {
    value
        .coerce(column.ty)
        .ok_or_else(|| InsightsError::TypeMismatch {
            table: table.name(),
            column: column.name,
            expected: column.ty.as_str(),
            found: value.type_name(),
        })
}

fn bind_value<'q>(query: SqliteQuery<'q>, value: &Value) -> SqliteQuery<'q> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Integer(v) => query.bind(*v),
        Value::Real(v) => query.bind(*v),
        Value::Text(v) => query.bind(v.clone()),
        Value::Bool(v) => query.bind(*v),
        Value::Date(v) => query.bind(*v),
    }
}

fn row_to_record(table: Table, row: &SqliteRow) -> Result<Record> {
    let mut fields = FieldMap::new();
    for column in table.columns() {
        fields.insert(column.name, decode_column(table, column, row)?);
    }
    Ok(Record::new(table, fields))
}

fn decode_column(table: Table, column: &'static Column, row: &SqliteRow) -> Result<Value> {
    let decode_err = |e: sqlx::Error| InsightsError::Decode {
        table: table.name(),
        column: column.name,
        reason: e.to_string(),
    };
    // SQLite columns are loosely typed, so decode by the declared type
    // and let the engine coerce.
    let value: Value = match column.ty {
        ColumnType::Integer => row
            .try_get_unchecked::<Option<i64>, _>(column.name)
            .map_err(decode_err)?
            .into(),
        ColumnType::Real => row
            .try_get_unchecked::<Option<f64>, _>(column.name)
            .map_err(decode_err)?
            .into(),
        ColumnType::Text => row
            .try_get_unchecked::<Option<String>, _>(column.name)
            .map_err(decode_err)?
            .into(),
        ColumnType::Boolean => row
            .try_get_unchecked::<Option<i64>, _>(column.name)
            .map_err(decode_err)?
            .map(|v| v != 0)
            .into(),
        ColumnType::Date => row
            .try_get_unchecked::<Option<NaiveDate>, _>(column.name)
            .map_err(decode_err)?
            .into(),
    };
    Ok(value)
}
