// Common test utilities for integration tests

use actix_web::{cookie::Cookie, test::TestRequest, web};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};

use aidhub::{
    AppState,
    api::{self, helpers},
    config::Config,
    database::{
        models::{financial_aid, subscription_plan, user},
        schema, seed,
        types::{AccountStatus, SystemRole},
    },
};

/// Creates an in-memory database with the schema and reference data
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

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 8080,
        timezone: Some("Asia/Manila".to_string()),
        max_body_bytes: None,
        cors_allowed_origin: None,
        workers: Some(1),
    }
}

pub async fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState {
        db: setup_test_db().await,
        config: test_config(),
    })
}

/// Same wiring as the server binary, minus middleware
pub fn app_config(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let limit = state.config.effective_max_body_bytes();
        cfg.app_data(state).app_data(helpers::payload_config(limit));
        api::init_routes(cfg);
    }
}

pub async fn create_user(db: &DatabaseConnection, email: &str, role: SystemRole) -> user::Model {
    let now = Utc::now();
    user::ActiveModel {
        firstname: Set("Ana".to_string()),
        lastname: Set("Reyes".to_string()),
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

pub async fn plan_id(db: &DatabaseConnection, name: &str) -> i32 {
    subscription_plan::Entity::find()
        .filter(subscription_plan::Column::PlanName.eq(name))
        .one(db)
        .await
        .expect("Failed to query plans")
        .expect("Seeded plan missing")
        .plan_id
}

pub async fn find_facility(db: &DatabaseConnection, owner_id: i32) -> Option<financial_aid::Model> {
    financial_aid::Entity::find()
        .filter(financial_aid::Column::UserId.eq(owner_id))
        .one(db)
        .await
        .expect("Failed to query facilities")
}

/// Attaches the cookies the upstream auth layer would set
pub fn authed(req: TestRequest, user: &user::Model) -> TestRequest {
    req.cookie(Cookie::new("session_id", "test-session"))
        .cookie(Cookie::new("user_id", user.id.to_string()))
}
