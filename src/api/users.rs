use actix_web::{HttpRequest, HttpResponse, get, post, web};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    AppState,
    api::{context::resolve_user_context, extract::JsonBody, helpers, validation::ValidationErrors},
    database::{
        models::{system_role, user},
        types::{AccountStatus, SystemRole},
    },
    errors::AppError,
};

// bcrypt::DEFAULT_COST makes unit tests crawl
#[cfg(not(test))]
const HASH_COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const HASH_COST: u32 = 4;

// --- DTOs (Data Transfer Objects) ---

#[derive(Deserialize, ToSchema, Clone, Debug, Default)]
pub struct RegisterUserDto {
    pub firstname: Option<String>,
    pub middlename: Option<String>,
    pub lastname: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
    /// 2 = director, 3 = employee, 4 = beneficiary
    pub systemrole_id: Option<i32>,
}

// --- Helper Functions ---

pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(bcrypt::hash(password, HASH_COST)?)
}

/// Emails are stored lowercase, so an exact match is enough.
pub async fn email_taken<C>(db: &C, email: &str, except: Option<i32>) -> Result<bool, AppError>
where
    C: ConnectionTrait,
{
    let mut query = user::Entity::find().filter(user::Column::Email.eq(email));
    if let Some(id) = except {
        query = query.filter(user::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

fn validate_registration(dto: &RegisterUserDto) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.required("firstname", dto.firstname.as_deref(), 255);
    errors.optional("middlename", dto.middlename.as_deref(), 255);
    errors.required("lastname", dto.lastname.as_deref(), 255);
    errors.contact_number("contact_number", dto.contact_number.as_deref());
    errors.optional("address", dto.address.as_deref(), 500);
    errors.email("email", dto.email.as_deref());
    errors.password(dto.password.as_deref(), dto.password_confirmation.as_deref());
    if dto.systemrole_id.is_none() {
        errors.add("systemrole_id", "The systemrole id field is required.");
    }
    errors
}

pub async fn register_user(
    db: &DatabaseConnection,
    dto: RegisterUserDto,
) -> Result<user::Model, AppError> {
    let mut errors = validate_registration(&dto);

    if let Some(role_id) = dto.systemrole_id {
        let role = system_role::Entity::find_by_id(role_id).one(db).await?;
        if role.is_none() {
            errors.add("systemrole_id", "The selected systemrole id is invalid.");
        } else if SystemRole::from_id(role_id) == Some(SystemRole::Admin) {
            errors.add("systemrole_id", "Admin accounts cannot be self-registered.");
        }
    }

    let email = dto.email.as_deref().unwrap_or_default().trim().to_string();
    if !errors.has("email") && email_taken(db, &email, None).await? {
        errors.add("email", "The email has already been taken.");
    }
    errors.into_result()?;

    let now = Utc::now();
    let created = user::ActiveModel {
        firstname: Set(dto.firstname.unwrap_or_default().trim().to_string()),
        middlename: Set(dto.middlename),
        lastname: Set(dto.lastname.unwrap_or_default().trim().to_string()),
        contact_number: Set(dto.contact_number),
        address: Set(dto.address),
        email: Set(email),
        password: Set(hash_password(dto.password.as_deref().unwrap_or_default())?),
        status: Set(AccountStatus::Active.as_str().to_string()),
        systemrole_id: Set(dto.systemrole_id.unwrap_or(SystemRole::Beneficiary.id())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!("Registered user {} with role {}", created.id, created.systemrole_id);
    Ok(created)
}

// --- Route Handlers ---

#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Users",
    request_body = RegisterUserDto,
    responses(
        (status = 201, description = "Account created", body = user::Model),
        (status = 422, description = "Validation failed")
    )
)]
#[post("/register")]
pub async fn register(
    app_state: web::Data<AppState>,
    body: JsonBody<RegisterUserDto>,
) -> Result<HttpResponse, AppError> {
    let created = register_user(&app_state.db, body.into_inner()).await?;
    Ok(helpers::created(created, "Registration successful."))
}

#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Users",
    responses(
        (status = 200, description = "The authenticated caller", body = user::Model),
        (status = 401, description = "Missing or invalid cookies")
    )
)]
#[get("/user")]
pub async fn current_user(
    app_state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = resolve_user_context(&req, &app_state).await?;
    Ok(helpers::ok(ctx.user, "User retrieved successfully."))
}

// Функция для регистрации всех маршрутов этого модуля
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(current_user);
}
