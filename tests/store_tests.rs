use chrono::NaiveDate;
use sqlx::{ConnectOptions, Connection, Row};
use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use zomato_insights::db::{Cuisine, NewCustomer, NewRestaurant};
use zomato_insights::{ErrorKind, FieldMap, Predicate, Store, Table, Value};

struct TempDb {
    path: PathBuf,
}

impl TempDb {
    fn new(label: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "zomato-insights-{label}-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));
        Self { path }
    }

    fn url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    async fn open(&self) -> Store {
        Store::open(&self.url()).await.expect("failed to open store")
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
        for suffix in ["-wal", "-shm", "-journal"] {
            let _ = fs::remove_file(format!("{}{suffix}", self.path.display()));
        }
    }
}

fn asha() -> FieldMap {
    FieldMap::new()
        .with("name", "Asha")
        .with("email", "a@x.com")
        .with("phone", "555")
        .with("location", "Pune")
        .with("signup_date", "2024-01-01")
        .with("is_premium", true)
        .with("preferred_cuisine", "Indian")
        .with("total_orders", 3)
        .with("average_rating", 4.5)
}

#[tokio::test]
async fn customer_insert_read_delete_scenario() {
    let db = TempDb::new("scenario");
    let store = db.open().await;

    let id = store
        .create_entry(Table::Customers, &asha())
        .await
        .expect("insert failed");

    let rows = store.read_entries(Table::Customers).await.expect("read failed");
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.id(), Some(id));
    assert_eq!(row.get("name"), Some(&Value::Text("Asha".into())));
    assert_eq!(row.get("email"), Some(&Value::Text("a@x.com".into())));
    assert_eq!(row.get("phone"), Some(&Value::Text("555".into())));
    assert_eq!(row.get("location"), Some(&Value::Text("Pune".into())));
    assert_eq!(
        row.get("signup_date"),
        Some(&Value::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
    );
    assert_eq!(row.get("is_premium"), Some(&Value::Bool(true)));
    assert_eq!(row.get("preferred_cuisine"), Some(&Value::Text("Indian".into())));
    assert_eq!(row.get("total_orders"), Some(&Value::Integer(3)));
    assert_eq!(row.get("average_rating"), Some(&Value::Real(4.5)));

    let removed = store
        .delete_by_id(Table::Customers, id)
        .await
        .expect("delete failed");
    assert_eq!(removed, 1);
    assert!(store.read_entries(Table::Customers).await.unwrap().is_empty());
}

#[tokio::test]
async fn auto_assigned_ids_are_unused() {
    let db = TempDb::new("ids");
    let store = db.open().await;

    let first = store.create_entry(Table::Customers, &asha()).await.unwrap();
    let second = store.create_entry(Table::Customers, &asha()).await.unwrap();
    assert_ne!(first, second);

    let mut ids: Vec<_> = store
        .read_entries(Table::Customers)
        .await
        .unwrap()
        .iter()
        .filter_map(|r| r.id())
        .collect();
    ids.sort();
    assert_eq!(ids, {
        let mut expected = vec![first, second];
        expected.sort();
        expected
    });
}

#[tokio::test]
async fn empty_table_reads_as_empty_sequence() {
    let db = TempDb::new("empty");
    let store = db.open().await;

    for table in Table::ALL {
        let rows = store.read_entries(table).await.expect("read failed");
        assert!(rows.is_empty(), "{table} should be empty");
    }
}

#[tokio::test]
async fn deleting_missing_id_is_a_no_op() {
    let db = TempDb::new("missing");
    let store = db.open().await;
    store.create_entry(Table::Customers, &asha()).await.unwrap();

    let before = store.read_entries(Table::Customers).await.unwrap().len();
    let removed = store.delete_by_id(Table::Customers, 9_999).await.unwrap();
    let after = store.read_entries(Table::Customers).await.unwrap().len();

    assert_eq!(removed, 0);
    assert_eq!(before, after);
}

#[tokio::test]
async fn duplicate_primary_key_is_a_constraint_error() {
    let db = TempDb::new("dup");
    let store = db.open().await;

    let explicit = asha().with("customer_id", 42);
    store.create_entry(Table::Customers, &explicit).await.unwrap();

    let dup = explicit.clone().with("name", "Ravi");
    let err = store
        .create_entry(Table::Customers, &dup)
        .await
        .expect_err("duplicate key should fail");
    assert_eq!(err.kind(), ErrorKind::Constraint);

    let rows = store.read_entries(Table::Customers).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&Value::Text("Asha".into())));
}

#[tokio::test]
async fn init_schema_is_idempotent() {
    let db = TempDb::new("idem");
    let store = db.open().await;
    store.create_entry(Table::Customers, &asha()).await.unwrap();
    let before = store.read_entries(Table::Customers).await.unwrap();

    store.init_schema().await.expect("first re-init failed");
    store.init_schema().await.expect("second re-init failed");
    let reopened = db.open().await;

    let after = reopened.read_entries(Table::Customers).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn created_tables_match_descriptors() {
    let db = TempDb::new("pragma");
    let store = db.open().await;

    let mut conn = store.options().connect().await.unwrap();
    for table in Table::ALL {
        let rows = sqlx::query(&format!("PRAGMA table_info({})", table.name()))
            .fetch_all(&mut conn)
            .await
            .unwrap();
        let names: Vec<String> = rows.iter().map(|r| r.get::<String, _>("name")).collect();
        let expected: Vec<&str> = table.columns().iter().map(|c| c.name).collect();
        assert_eq!(names, expected);
    }
    conn.close().await.unwrap();
}

#[tokio::test]
async fn unknown_column_is_rejected_before_execution() {
    let db = TempDb::new("unknown-col");
    let store = db.open().await;

    let fields = FieldMap::new()
        .with("name", "Spice Route")
        .with("email", "nope@x.com");
    let err = store
        .create_entry(Table::Restaurants, &fields)
        .await
        .expect_err("restaurants have no email column");
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(store.read_entries(Table::Restaurants).await.unwrap().is_empty());

    let err = store
        .create_entry(Table::Restaurants, &FieldMap::new())
        .await
        .expect_err("empty insert should fail");
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[tokio::test]
async fn mistyped_value_is_a_constraint_error() {
    let db = TempDb::new("mistyped");
    let store = db.open().await;

    let fields = asha().with("total_orders", "three");
    let err = store
        .create_entry(Table::Customers, &fields)
        .await
        .expect_err("text into integer column should fail");
    assert_eq!(err.kind(), ErrorKind::Constraint);
    assert!(store.read_entries(Table::Customers).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_table_is_reported_as_schema_error() {
    let db = TempDb::new("no-schema");
    // Skip init_schema so the engine itself rejects the statement.
    let store = Store::from_url(&db.url()).unwrap();

    let err = store
        .read_entries(Table::Customers)
        .await
        .expect_err("table was never created");
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[tokio::test]
async fn unopenable_database_is_a_startup_error() {
    let db = TempDb::new("startup");
    let url = format!(
        "sqlite:{}",
        db.path.join("missing-dir").join("zomato.db").display()
    );

    let err = Store::open(&url).await.expect_err("open should fail");
    assert_eq!(err.kind(), ErrorKind::Startup);
}

#[tokio::test]
async fn predicate_delete_binds_values() {
    let db = TempDb::new("predicate");
    let store = db.open().await;
    store.create_entry(Table::Customers, &asha()).await.unwrap();
    store
        .create_entry(Table::Customers, &asha().with("location", "Delhi"))
        .await
        .unwrap();

    // A value that would match everything if it were interpolated.
    let hostile = Predicate::eq("location", "Pune' OR '1'='1");
    assert_eq!(store.delete_entry(Table::Customers, &hostile).await.unwrap(), 0);

    let pune = Predicate::eq("location", "Pune").and_eq("is_premium", true);
    assert_eq!(store.delete_entry(Table::Customers, &pune).await.unwrap(), 1);

    let rows = store.read_entries(Table::Customers).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("location"), Some(&Value::Text("Delhi".into())));
}

#[tokio::test]
async fn typed_entities_round_trip() {
    let db = TempDb::new("typed");
    let store = db.open().await;

    let customer = NewCustomer {
        name: "Asha".into(),
        email: "a@x.com".into(),
        phone: "555".into(),
        location: "Pune".into(),
        signup_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        is_premium: false,
        preferred_cuisine: Cuisine::Italian,
        total_orders: 0,
        average_rating: 3.0,
    };
    let restaurant = NewRestaurant {
        name: "Trattoria".into(),
        cuisine_type: Cuisine::Italian,
        location: "Mumbai".into(),
        owner_name: "Luca".into(),
        average_delivery_time: 45.0,
        contact_number: "022-555".into(),
        rating: 4.8,
        total_orders: 900,
        is_active: true,
    };

    let customer_id = store.add_customer(&customer).await.unwrap();
    let restaurant_id = store.add_restaurant(&restaurant).await.unwrap();

    let customers = store.list_customers().await.unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].customer_id, customer_id);
    assert_eq!(customers[0].details, customer);

    let restaurants = store.list_restaurants().await.unwrap();
    assert_eq!(restaurants.len(), 1);
    assert_eq!(restaurants[0].restaurant_id, restaurant_id);
    assert_eq!(restaurants[0].details, restaurant);
}

#[tokio::test]
async fn invalid_typed_entity_is_not_persisted() {
    let db = TempDb::new("invalid");
    let store = db.open().await;

    let restaurant = NewRestaurant {
        name: "Ghost Kitchen".into(),
        cuisine_type: Cuisine::American,
        location: "Pune".into(),
        owner_name: "Sam".into(),
        average_delivery_time: 20.0,
        contact_number: "555".into(),
        rating: 0.5,
        total_orders: 1,
        is_active: true,
    };
    let err = store.add_restaurant(&restaurant).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Constraint);
    assert!(store.list_restaurants().await.unwrap().is_empty());
}

#[tokio::test]
async fn non_finite_real_is_rejected() {
    let db = TempDb::new("nan");
    let store = db.open().await;

    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let fields = FieldMap::new()
            .with("name", "X")
            .with("average_rating", bad);
        let err = store
            .create_entry(Table::Customers, &fields)
            .await
            .expect_err("non-finite real should not be stored");
        assert_eq!(err.kind(), ErrorKind::Constraint);
    }
    assert!(store.read_entries(Table::Customers).await.unwrap().is_empty());
}

#[tokio::test]
async fn date_text_is_stored_in_iso_form() {
    let db = TempDb::new("iso-date");
    let store = db.open().await;

    let id = store
        .create_entry(
            Table::Customers,
            &FieldMap::new().with("name", "X").with("signup_date", "2024-1-1"),
        )
        .await
        .unwrap();

    let mut conn = store.options().connect().await.unwrap();
    let stored: String = sqlx::query("SELECT signup_date FROM Customers WHERE customer_id = ?")
        .bind(id)
        .fetch_one(&mut conn)
        .await
        .unwrap()
        .get("signup_date");
    conn.close().await.unwrap();
    assert_eq!(stored, "2024-01-01");

    let rows = store.read_entries(Table::Customers).await.unwrap();
    assert_eq!(
        rows[0].get("signup_date"),
        Some(&Value::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
    );
}

#[tokio::test]
async fn partial_mapping_reads_back_nulls() {
    let db = TempDb::new("partial");
    let store = db.open().await;

    let fields = FieldMap::new().with("name", "Asha").with("total_orders", 2);
    let id = store.create_entry(Table::Customers, &fields).await.unwrap();

    let rows = store.read_entries(Table::Customers).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.id(), Some(id));
    assert_eq!(row.get("name"), Some(&Value::Text("Asha".into())));
    assert_eq!(row.get("total_orders"), Some(&Value::Integer(2)));
    for column in ["email", "phone", "location", "signup_date", "is_premium", "average_rating"] {
        assert_eq!(row.get(column), Some(&Value::Null), "{column} should be NULL");
    }

    let err = store
        .list_customers()
        .await
        .expect_err("typed listing needs every field");
    assert_eq!(err.kind(), ErrorKind::Execution);
}

#[tokio::test]
async fn restaurant_generic_round_trip() {
    let db = TempDb::new("restaurant");
    let store = db.open().await;

    let fields = FieldMap::new()
        .with("name", "Spice Route")
        .with("cuisine_type", "Indian")
        .with("location", "Pune")
        .with("owner_name", "Meera")
        .with("average_delivery_time", 30)
        .with("contact_number", "020-555")
        .with("rating", 4.2)
        .with("total_orders", 120)
        .with("is_active", false);
    let id = store.create_entry(Table::Restaurants, &fields).await.unwrap();

    let rows = store.read_entries(Table::Restaurants).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.id(), Some(id));
    assert_eq!(row.get("name"), Some(&Value::Text("Spice Route".into())));
    assert_eq!(row.get("cuisine_type"), Some(&Value::Text("Indian".into())));
    assert_eq!(row.get("owner_name"), Some(&Value::Text("Meera".into())));
    // Integer input lands in a REAL column.
    assert_eq!(row.get("average_delivery_time"), Some(&Value::Real(30.0)));
    assert_eq!(row.get("rating"), Some(&Value::Real(4.2)));
    assert_eq!(row.get("total_orders"), Some(&Value::Integer(120)));
    assert_eq!(row.get("is_active"), Some(&Value::Bool(false)));

    assert_eq!(store.delete_by_id(Table::Restaurants, id).await.unwrap(), 1);
    assert!(store.read_entries(Table::Restaurants).await.unwrap().is_empty());
}
