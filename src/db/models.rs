use crate::db::table::Table;
use crate::db::value::{FieldMap, Record};
use crate::error::{InsightsError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cuisines offered when adding customers and restaurants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cuisine {
    Indian,
    Chinese,
    Italian,
    Mexican,
    American,
}

impl Cuisine {
    pub const ALL: [Cuisine; 5] = [
        Cuisine::Indian,
        Cuisine::Chinese,
        Cuisine::Italian,
        Cuisine::Mexican,
        Cuisine::American,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Cuisine::Indian => "Indian",
            Cuisine::Chinese => "Chinese",
            Cuisine::Italian => "Italian",
            Cuisine::Mexican => "Mexican",
            Cuisine::American => "American",
        }
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cuisine {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self> {
        Cuisine::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InsightsError::InvalidField {
                field: "cuisine",
                reason: format!("unknown cuisine {s:?}"),
            })
    }
}

fn check_rating(field: &'static str, value: f64) -> Result<()> {
    if (1.0..=5.0).contains(&value) {
        Ok(())
    } else {
        Err(InsightsError::InvalidField {
            field,
            reason: format!("{value} is outside 1.0..=5.0"),
        })
    }
}

fn check_orders(value: i64) -> Result<()> {
    if value >= 0 {
        Ok(())
    } else {
        Err(InsightsError::InvalidField {
            field: "total_orders",
            reason: format!("{value} is negative"),
        })
    }
}

fn cuisine_field(record: &Record, column: &'static str) -> Result<Cuisine> {
    record
        .text(column)?
        .parse()
        .map_err(|e: InsightsError| InsightsError::Decode {
            table: record.table().name(),
            column,
            reason: e.to_string(),
        })
}

/// Customer fields supplied by the caller; the id is assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub signup_date: NaiveDate,
    pub is_premium: bool,
    pub preferred_cuisine: Cuisine,
    pub total_orders: i64,
    pub average_rating: f64,
}

impl NewCustomer {
    pub fn validate(&self) -> Result<()> {
        check_orders(self.total_orders)?;
        check_rating("average_rating", self.average_rating)
    }

    /// Non-key columns in schema order.
    pub fn to_fields(&self) -> FieldMap {
        FieldMap::new()
            .with("name", self.name.as_str())
            .with("email", self.email.as_str())
            .with("phone", self.phone.as_str())
            .with("location", self.location.as_str())
            .with("signup_date", self.signup_date)
            .with("is_premium", self.is_premium)
            .with("preferred_cuisine", self.preferred_cuisine.as_str())
            .with("total_orders", self.total_orders)
            .with("average_rating", self.average_rating)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    #[serde(flatten)]
    pub details: NewCustomer,
}

impl TryFrom<Record> for Customer {
    type Error = InsightsError;

    fn try_from(r: Record) -> Result<Self> {
        if r.table() != Table::Customers {
            return Err(InsightsError::UnknownTable(r.table().name().to_string()));
        }
        Ok(Customer {
            customer_id: r.integer("customer_id")?,
            details: NewCustomer {
                name: r.text("name")?.to_string(),
                email: r.text("email")?.to_string(),
                phone: r.text("phone")?.to_string(),
                location: r.text("location")?.to_string(),
                signup_date: r.date("signup_date")?,
                is_premium: r.boolean("is_premium")?,
                preferred_cuisine: cuisine_field(&r, "preferred_cuisine")?,
                total_orders: r.integer("total_orders")?,
                average_rating: r.real("average_rating")?,
            },
        })
    }
}

/// Restaurant fields supplied by the caller; the id is assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRestaurant {
    pub name: String,
    pub cuisine_type: Cuisine,
    pub location: String,
    pub owner_name: String,
    /// Minutes.
    pub average_delivery_time: f64,
    pub contact_number: String,
    pub rating: f64,
    pub total_orders: i64,
    pub is_active: bool,
}

impl NewRestaurant {
    pub fn validate(&self) -> Result<()> {
        if !self.average_delivery_time.is_finite() || self.average_delivery_time <= 0.0 {
            return Err(InsightsError::InvalidField {
                field: "average_delivery_time",
                reason: format!("{} must be positive", self.average_delivery_time),
            });
        }
        check_rating("rating", self.rating)?;
        check_orders(self.total_orders)
    }

    pub fn to_fields(&self) -> FieldMap {
        FieldMap::new()
            .with("name", self.name.as_str())
            .with("cuisine_type", self.cuisine_type.as_str())
            .with("location", self.location.as_str())
            .with("owner_name", self.owner_name.as_str())
            .with("average_delivery_time", self.average_delivery_time)
            .with("contact_number", self.contact_number.as_str())
            .with("rating", self.rating)
            .with("total_orders", self.total_orders)
            .with("is_active", self.is_active)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub restaurant_id: i64,
    #[serde(flatten)]
    pub details: NewRestaurant,
}

impl TryFrom<Record> for Restaurant {
    type Error = InsightsError;

    fn try_from(r: Record) -> Result<Self> {
        if r.table() != Table::Restaurants {
            return Err(InsightsError::UnknownTable(r.table().name().to_string()));
        }
        Ok(Restaurant {
            restaurant_id: r.integer("restaurant_id")?,
            details: NewRestaurant {
                name: r.text("name")?.to_string(),
                cuisine_type: cuisine_field(&r, "cuisine_type")?,
                location: r.text("location")?.to_string(),
                owner_name: r.text("owner_name")?.to_string(),
                average_delivery_time: r.real("average_delivery_time")?,
                contact_number: r.text("contact_number")?.to_string(),
                rating: r.real("rating")?,
                total_orders: r.integer("total_orders")?,
                is_active: r.boolean("is_active")?,
            },
        })
    }
}
