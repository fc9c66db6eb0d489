use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};

use crate::{
    api::{
        context::{resolve_admin_context, resolve_user_context},
        extract::JsonBody,
        helpers,
    },
    app_state::AppState,
    database::models::subscription_plan,
    errors::AppError,
};

use super::{functions, structures::PlanDto};

#[utoipa::path(
    get,
    path = "/api/subscription-plans",
    tag = "Subscription Plans",
    responses(
        (status = 200, description = "All plans ordered by name", body = [subscription_plan::Model])
    )
)]
#[get("")]
pub async fn get_plans(
    app_state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    resolve_user_context(&req, &app_state).await?;
    let plans = functions::list(&app_state.db).await?;
    Ok(helpers::ok(plans, "Subscription plans retrieved successfully."))
}

#[utoipa::path(
    get,
    path = "/api/subscription-plans/{id}",
    tag = "Subscription Plans",
    params(
        ("id" = i32, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "Plan found", body = subscription_plan::Model),
        (status = 404, description = "Plan not found")
    )
)]
#[get("/{id}")]
pub async fn get_plan(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    resolve_user_context(&req, &app_state).await?;
    let plan = functions::find(&app_state.db, path.into_inner()).await?;
    Ok(helpers::ok(plan, "Subscription plan retrieved successfully."))
}

#[utoipa::path(
    post,
    path = "/api/subscription-plans",
    tag = "Subscription Plans",
    request_body = PlanDto,
    responses(
        (status = 201, description = "Plan created", body = subscription_plan::Model),
        (status = 403, description = "Admin role required"),
        (status = 422, description = "Validation failed or name taken")
    )
)]
#[post("")]
pub async fn create_plan(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    body: JsonBody<PlanDto>,
) -> Result<HttpResponse, AppError> {
    resolve_admin_context(&req, &app_state).await?;
    let plan = functions::create(&app_state.db, body.into_inner()).await?;
    Ok(helpers::created(plan, "Subscription plan created successfully."))
}

#[utoipa::path(
    put,
    path = "/api/subscription-plans/{id}",
    tag = "Subscription Plans",
    params(
        ("id" = i32, Path, description = "Plan ID")
    ),
    request_body = PlanDto,
    responses(
        (status = 200, description = "Plan updated", body = subscription_plan::Model),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Plan not found"),
        (status = 422, description = "Validation failed or name taken")
    )
)]
#[put("/{id}")]
pub async fn update_plan(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
    body: JsonBody<PlanDto>,
) -> Result<HttpResponse, AppError> {
    resolve_admin_context(&req, &app_state).await?;
    let plan = functions::update(&app_state.db, path.into_inner(), body.into_inner()).await?;
    Ok(helpers::ok(plan, "Subscription plan updated successfully."))
}

#[utoipa::path(
    delete,
    path = "/api/subscription-plans/{id}",
    tag = "Subscription Plans",
    params(
        ("id" = i32, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "Plan deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Plan not found"),
        (status = 422, description = "Plan has active subscriptions")
    )
)]
#[delete("/{id}")]
pub async fn delete_plan(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    resolve_admin_context(&req, &app_state).await?;
    functions::destroy(&app_state.db, path.into_inner()).await?;
    Ok(helpers::message_only("Subscription plan deleted successfully."))
}

// Регистрация маршрутов модуля
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subscription-plans")
            .service(get_plans)
            .service(create_plan)
            .service(get_plan)
            .service(update_plan)
            .service(delete_plan),
    );
}
