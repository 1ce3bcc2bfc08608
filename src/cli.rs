//! Command-line surface: view, add and delete records.

use crate::db::{Cuisine, NewCustomer, NewRestaurant, Record, Store, Table, Value};
use crate::error::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "zomato-insights",
    version,
    about = "Zomato data insights: view, add and delete customers and restaurants"
)]
pub struct Cli {
    /// Database URL, overriding the configured one (e.g. sqlite:zomato.db).
    #[arg(long, global = true)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the database and its tables if they are missing.
    Init,
    /// Print every row of a table.
    View {
        #[arg(value_parser = parse_table)]
        table: Table,
        /// Emit JSON records instead of a text table.
        #[arg(long)]
        json: bool,
    },
    /// Add a customer or restaurant.
    #[command(subcommand)]
    Add(AddCommand),
    /// Delete one row by its id.
    Delete {
        #[arg(value_parser = parse_table)]
        table: Table,
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum AddCommand {
    Customer(CustomerArgs),
    Restaurant(RestaurantArgs),
}

#[derive(Debug, Args)]
pub struct CustomerArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub location: String,
    /// YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    pub signup_date: NaiveDate,
    #[arg(long)]
    pub premium: bool,
    #[arg(long, value_parser = parse_cuisine)]
    pub cuisine: Cuisine,
    #[arg(long, default_value_t = 1)]
    pub total_orders: i64,
    #[arg(long, default_value_t = 1.0)]
    pub average_rating: f64,
}

impl From<CustomerArgs> for NewCustomer {
    fn from(a: CustomerArgs) -> Self {
        NewCustomer {
            name: a.name,
            email: a.email,
            phone: a.phone,
            location: a.location,
            signup_date: a.signup_date,
            is_premium: a.premium,
            preferred_cuisine: a.cuisine,
            total_orders: a.total_orders,
            average_rating: a.average_rating,
        }
    }
}

#[derive(Debug, Args)]
pub struct RestaurantArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, value_parser = parse_cuisine)]
    pub cuisine: Cuisine,
    #[arg(long)]
    pub location: String,
    #[arg(long)]
    pub owner_name: String,
    /// Minutes.
    #[arg(long)]
    pub average_delivery_time: f64,
    #[arg(long)]
    pub contact_number: String,
    #[arg(long, default_value_t = 1.0)]
    pub rating: f64,
    #[arg(long, default_value_t = 1)]
    pub total_orders: i64,
    #[arg(long)]
    pub active: bool,
}

impl From<RestaurantArgs> for NewRestaurant {
    fn from(a: RestaurantArgs) -> Self {
        NewRestaurant {
            name: a.name,
            cuisine_type: a.cuisine,
            location: a.location,
            owner_name: a.owner_name,
            average_delivery_time: a.average_delivery_time,
            contact_number: a.contact_number,
            rating: a.rating,
            total_orders: a.total_orders,
            is_active: a.active,
        }
    }
}

fn parse_table(s: &str) -> std::result::Result<Table, String> {
    s.parse().map_err(|e: crate::InsightsError| e.to_string())
}

fn parse_cuisine(s: &str) -> std::result::Result<Cuisine, String> {
    s.parse().map_err(|e: crate::InsightsError| e.to_string())
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, crate::db::value::DATE_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

/// Run one command against `store` and return what should be printed.
pub async fn run(store: &Store, command: Command) -> Result<String> {
    match command {
        Command::Init => Ok("Welcome to Zomato Data Insights".to_string()),
        Command::View { table, json } => {
            let records = store.read_entries(table).await?;
            if json {
                Ok(serde_json::to_string_pretty(&records)?)
            } else {
                Ok(render_table(table, &records))
            }
        }
        Command::Add(AddCommand::Customer(args)) => {
            let id = store.add_customer(&args.into()).await?;
            Ok(format!("Customer added successfully! (id {id})"))
        }
        Command::Add(AddCommand::Restaurant(args)) => {
            let id = store.add_restaurant(&args.into()).await?;
            Ok(format!("Restaurant added successfully! (id {id})"))
        }
        Command::Delete { table, id } => {
            let removed = store.delete_by_id(table, id).await?;
            info!(table = %table, id, removed, "delete requested");
            if removed == 0 {
                Ok(format!("No {} with id {id}", table.entity()))
            } else {
                Ok(format!("{} deleted successfully!", table.entity()))
            }
        }
    }
}

/// Text table with the human column headings.
pub fn render_table(table: Table, records: &[Record]) -> String {
    let header: Vec<&str> = table.columns().iter().map(|c| c.label).collect();
    let mut out = header.join(" | ");
    for record in records {
        let cells: Vec<String> = table
            .columns()
            .iter()
            .map(|c| record.get(c.name).map(format_cell).unwrap_or_default())
            .collect();
        out.push('\n');
        out.push_str(&cells.join(" | "));
    }
    out
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(v) => v.to_string(),
        Value::Real(v) => v.to_string(),
        Value::Text(v) => v.clone(),
        Value::Bool(v) => (if *v { "Yes" } else { "No" }).to_string(),
        Value::Date(v) => v.to_string(),
    }
}
