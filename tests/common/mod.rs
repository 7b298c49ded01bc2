#![allow(dead_code)]
use keel::{Record, Registry, Session, Shape, Value};
use keel_mock::MockConnection;
use log::LevelFilter;
use rust_decimal::Decimal;
use std::{env, sync::Arc};

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

#[derive(Default, Debug, Clone, PartialEq, Shape)]
pub struct Audit {
    pub created_by: Option<String>,
    pub version: i32,
}

#[derive(Default, Debug, Clone, PartialEq, Record)]
#[keel(table = "orders")]
pub struct Order {
    #[keel(primary_key)]
    pub id: i64,
    pub customer: String,
    pub amount: Option<Decimal>,
    pub status: String,
    pub customer_id: Option<i64>,
    #[keel(parent)]
    pub audit: Audit,
}

#[derive(Default, Debug, Clone, PartialEq, Record)]
#[keel(table = "customers", schema = "crm")]
pub struct Customer {
    #[keel(primary_key)]
    pub id: i64,
    pub name: String,
    pub country: Option<String>,
}

pub const ORDER_COLUMNS: [&str; 5] = ["id", "customer", "amount", "status", "customer_id"];

/// Row of the `orders` table.
pub fn order_row(id: i64, customer: &str, status: &str) -> Vec<Value> {
    vec![
        Value::Int64(Some(id)),
        Value::Varchar(Some(customer.into())),
        Value::Decimal(Some(Decimal::new(id * 100, 1))),
        Value::Varchar(Some(status.into())),
        Value::Int64(None),
    ]
}

pub fn session(connection: MockConnection) -> Session<MockConnection> {
    let registry = Arc::new(Registry::new());
    registry
        .register::<Order>()
        .and_then(|r| r.register::<Customer>())
        .expect("The test records are valid");
    Session::new(connection, registry)
}
