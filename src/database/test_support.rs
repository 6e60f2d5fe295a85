use crate::entities::{client_entity as clients, order_entity as orders};
use crate::models::OrderStatus;
use chrono::{NaiveDate, Utc};
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use uuid::Uuid;

/// Fresh in-memory SQLite database with the full schema applied.
///
/// The pool is capped at a single connection: every `sqlite::memory:`
/// connection opens its own empty database, so the pool must never hand
/// out a second one.
pub async fn test_pool() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1);

    let pool = Database::connect(options)
        .await
        .expect("failed to open in-memory sqlite");
    Migrator::up(&pool, None)
        .await
        .expect("failed to run migrations");
    pool
}

/// Insert a throwaway client + order pair directly through the entities;
/// returns the order id.
pub async fn insert_order(pool: &DatabaseConnection, invoice_number: &str) -> Uuid {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    insert_order_dated(pool, invoice_number, date).await
}

pub async fn insert_order_dated(
    pool: &DatabaseConnection,
    invoice_number: &str,
    date: NaiveDate,
) -> Uuid {
    let client_id = Uuid::new_v4();
    clients::ActiveModel {
        id: Set(client_id),
        full_name: Set(format!("Client {invoice_number}")),
        address: Set("1 rue des Lilas".to_string()),
        email: Set(None),
        phone: Set(None),
        created_at: Set(Some(Utc::now())),
    }
    .insert(pool)
    .await
    .expect("failed to insert client");

    let order_id = Uuid::new_v4();
    orders::ActiveModel {
        id: Set(order_id),
        client_id: Set(client_id),
        invoice_number: Set(invoice_number.to_string()),
        total_amount: Set(Decimal::new(5000, 2)),
        order_date: Set(date),
        is_paid: Set(false),
        payment_method: Set(None),
        status: Set(OrderStatus::Ordered),
        created_at: Set(Some(Utc::now())),
    }
    .insert(pool)
    .await
    .expect("failed to insert order");

    order_id
}
