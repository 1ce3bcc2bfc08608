//! SQL DDL for initializing the insights database.
//! Column order and types mirror the descriptors in `table.rs`.

/// SQLite schema with:
/// - `Customers` and `Restaurants`, independent of each other (no foreign keys)
/// - `INTEGER PRIMARY KEY` ids, so the store assigns the rowid when omitted
/// - `BOOLEAN` columns holding 0/1, date columns holding `YYYY-MM-DD` text
/// - `IF NOT EXISTS` everywhere, so re-running never touches existing rows
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS Customers (
    customer_id INTEGER PRIMARY KEY,
    name TEXT,
    email TEXT,
    phone TEXT,
    location TEXT,
    signup_date TEXT,
    is_premium BOOLEAN,
    preferred_cuisine TEXT,
    total_orders INTEGER,
    average_rating REAL
);

CREATE TABLE IF NOT EXISTS Restaurants (
    restaurant_id INTEGER PRIMARY KEY,
    name TEXT,
    cuisine_type TEXT,
    location TEXT,
    owner_name TEXT,
    average_delivery_time REAL,
    contact_number TEXT,
    rating REAL,
    total_orders INTEGER,
    is_active BOOLEAN
);
"#;

/// Individual statements of [`SQLITE_INIT`], blanks skipped.
pub fn init_statements() -> impl Iterator<Item = &'static str> {
    // sqlx::query runs one statement at a time
    SQLITE_INIT
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
