use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};

use crate::{
    api::{context::resolve_user_context, extract::JsonBody, helpers, validation::ValidationErrors},
    app_state::AppState,
    errors::AppError,
};

use super::{
    functions,
    structures::{SubscribeDto, SubscriptionView, TransactionView},
};

#[utoipa::path(
    get,
    path = "/api/my-subscriptions",
    tag = "Subscriptions",
    responses(
        (status = 200, description = "Caller's subscriptions, newest first", body = [SubscriptionView]),
        (status = 401, description = "Missing or invalid cookies")
    )
)]
#[get("/my-subscriptions")]
pub async fn get_my_subscriptions(
    app_state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = resolve_user_context(&req, &app_state).await?;
    let today = app_state.config.today();
    let rows = functions::my_subscriptions(&app_state.db, ctx.user_id(), today).await?;
    Ok(helpers::ok(rows, "User subscriptions retrieved successfully."))
}

#[utoipa::path(
    post,
    path = "/api/subscribe",
    tag = "Subscriptions",
    request_body = SubscribeDto,
    responses(
        (status = 201, description = "Subscription created (Active or Pending)", body = SubscriptionView),
        (status = 404, description = "Subscription plan not found"),
        (status = 422, description = "Validation failed, Free plan, or a pending subscription already exists")
    )
)]
#[post("/subscribe")]
pub async fn subscribe(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    body: JsonBody<SubscribeDto>,
) -> Result<HttpResponse, AppError> {
    let ctx = resolve_user_context(&req, &app_state).await?;

    let Some(plan_id) = body.plan_id else {
        let mut errors = ValidationErrors::new();
        errors.add("plan_id", "The plan id field is required.");
        return Err(AppError::Validation(errors));
    };

    let today = app_state.config.today();
    let outcome = functions::subscribe(&app_state.db, ctx.user_id(), plan_id, today).await?;
    Ok(helpers::created(outcome.subscription, outcome.message))
}

#[utoipa::path(
    delete,
    path = "/api/cancel-pending-subscription",
    tag = "Subscriptions",
    responses(
        (status = 200, description = "Pending subscription cancelled"),
        (status = 404, description = "No pending subscription found")
    )
)]
#[delete("/cancel-pending-subscription")]
pub async fn cancel_pending_subscription(
    app_state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = resolve_user_context(&req, &app_state).await?;
    functions::cancel_pending(&app_state.db, ctx.user_id()).await?;
    Ok(helpers::message_only("Pending subscription cancelled successfully."))
}

#[utoipa::path(
    get,
    path = "/api/subscription-transactions",
    tag = "Subscriptions",
    responses(
        (status = 200, description = "Ledger rows, newest first", body = [TransactionView]),
        (status = 401, description = "Missing or invalid cookies")
    )
)]
#[get("/subscription-transactions")]
pub async fn get_transaction_history(
    app_state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = resolve_user_context(&req, &app_state).await?;
    let rows = functions::transaction_history(&app_state.db, ctx.user_id()).await?;
    Ok(helpers::ok(rows, "Transaction history retrieved successfully."))
}

// Регистрация маршрутов модуля
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_my_subscriptions)
        .service(subscribe)
        .service(cancel_pending_subscription)
        .service(get_transaction_history);
}
