// Test utilities shared across unit tests
// Only compiled when running tests

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

use crate::database::{
    models::{financial_aid, subscription_plan, user},
    schema, seed,
    types::{AccountStatus, SystemRole},
};

/// In-memory SQLite with the full schema and the reference data seeded.
/// A single pooled connection keeps every query on the same memory database.
pub async fn setup_test_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("Failed to create test database");

    schema::create_schema(&db)
        .await
        .expect("Failed to create schema");
    seed::seed_roles(&db).await.expect("Failed to seed roles");
    seed::seed_default_plans(&db)
        .await
        .expect("Failed to seed plans");

    db
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub async fn create_user(db: &DatabaseConnection, email: &str, role: SystemRole) -> user::Model {
    let now = Utc::now();
    user::ActiveModel {
        firstname: Set("Juan".to_string()),
        lastname: Set("Dela Cruz".to_string()),
        email: Set(email.to_string()),
        password: Set("not-a-real-hash".to_string()),
        status: Set(AccountStatus::Active.as_str().to_string()),
        systemrole_id: Set(role.id()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test user")
}

pub async fn create_facility(
    db: &DatabaseConnection,
    owner: &user::Model,
    approved: bool,
) -> financial_aid::Model {
    let now = Utc::now();
    financial_aid::ActiveModel {
        user_id: Set(owner.id),
        center_id: Set(format!("FAC-TEST{:04}", owner.id)),
        center_name: Set("Bayanihan Scholarship Center".to_string()),
        is_managable: Set(approved),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test facility")
}

pub async fn create_plan(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
    months: i32,
) -> subscription_plan::Model {
    let now = Utc::now();
    subscription_plan::ActiveModel {
        plan_name: Set(name.to_string()),
        price: Set(price),
        duration_in_months: Set(months),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test plan")
}
