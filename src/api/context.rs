use actix_web::{HttpRequest, web};
use sea_orm::EntityTrait;

use crate::{
    app_state::AppState,
    database::{
        models::user,
        types::{AccountStatus, SystemRole},
    },
    errors::AppError,
};

/// Authenticated caller, resolved once per request.
#[derive(Clone, Debug)]
pub struct UserContext {
    pub user: user::Model,
}

impl UserContext {
    pub fn user_id(&self) -> i32 {
        self.user.id
    }

    pub fn role(&self) -> Option<SystemRole> {
        SystemRole::from_id(self.user.systemrole_id)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(SystemRole::Admin)
    }

    pub fn is_same_user(&self, other: i32) -> bool {
        self.user.id == other
    }
}

fn parse_user_id_cookie(req: &HttpRequest) -> Result<i32, AppError> {
    let cookie = req
        .cookie("user_id")
        .ok_or_else(|| AppError::Unauthorized("Missing `user_id` cookie".to_string()))?;

    cookie
        .value()
        .parse::<i32>()
        .map_err(|_| AppError::Unauthorized("Invalid `user_id` cookie".to_string()))
}

/// Resolves the caller from the `session_id` / `user_id` cookies set by the
/// upstream auth layer. Inactive accounts are rejected.
pub async fn resolve_user_context(
    req: &HttpRequest,
    app_state: &web::Data<AppState>,
) -> Result<UserContext, AppError> {
    let _session_cookie = req
        .cookie("session_id")
        .ok_or_else(|| AppError::Unauthorized("Missing `session_id` cookie".to_string()))?;

    let user_id = parse_user_id_cookie(req)?;

    let user = user::Entity::find_by_id(user_id)
        .one(&app_state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    if user.status != AccountStatus::Active.as_str() {
        log::warn!("Rejected request from inactive user {}", user.id);
        return Err(AppError::Forbidden("Account is inactive".to_string()));
    }

    Ok(UserContext { user })
}

pub fn ensure_admin_access(ctx: &UserContext) -> Result<(), AppError> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin role required".to_string()))
    }
}

pub async fn resolve_admin_context(
    req: &HttpRequest,
    app_state: &web::Data<AppState>,
) -> Result<UserContext, AppError> {
    let ctx = resolve_user_context(req, app_state).await?;
    ensure_admin_access(&ctx)?;
    Ok(ctx)
}
