use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};

use crate::{
    api::{context::resolve_user_context, extract::JsonBody, helpers},
    app_state::AppState,
    database::models::user,
    errors::AppError,
};

use super::{
    functions,
    structures::{BeneficiaryPage, CreateBeneficiaryDto, PageQuery, UpdateBeneficiaryDto},
};

#[utoipa::path(
    get,
    path = "/api/beneficiaries",
    tag = "Beneficiaries",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of the facility's beneficiaries", body = BeneficiaryPage),
        (status = 404, description = "Caller has no facility")
    )
)]
#[get("")]
pub async fn get_beneficiaries(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let ctx = resolve_user_context(&req, &app_state).await?;
    let facility = functions::caller_facility(&app_state.db, ctx.user_id()).await?;
    let page = functions::list(&app_state.db, facility, &query).await?;
    Ok(helpers::ok(page, "Beneficiaries retrieved successfully."))
}

#[utoipa::path(
    post,
    path = "/api/beneficiaries",
    tag = "Beneficiaries",
    request_body = CreateBeneficiaryDto,
    responses(
        (status = 201, description = "Beneficiary enrolled", body = user::Model),
        (status = 404, description = "Caller has no facility"),
        (status = 422, description = "Validation failed or facility not approved")
    )
)]
#[post("")]
pub async fn create_beneficiary(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    body: JsonBody<CreateBeneficiaryDto>,
) -> Result<HttpResponse, AppError> {
    let ctx = resolve_user_context(&req, &app_state).await?;
    let beneficiary = functions::create(&app_state.db, ctx.user_id(), body.into_inner()).await?;
    Ok(helpers::created(beneficiary, "Beneficiary created successfully."))
}

#[utoipa::path(
    get,
    path = "/api/beneficiaries/{id}",
    tag = "Beneficiaries",
    params(
        ("id" = i32, Path, description = "Beneficiary user ID")
    ),
    responses(
        (status = 200, description = "Beneficiary found", body = user::Model),
        (status = 404, description = "Not a beneficiary of the caller's facility")
    )
)]
#[get("/{id}")]
pub async fn get_beneficiary(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let ctx = resolve_user_context(&req, &app_state).await?;
    let facility = functions::caller_facility(&app_state.db, ctx.user_id()).await?;
    let beneficiary = functions::find_scoped(&app_state.db, &facility, path.into_inner()).await?;
    Ok(helpers::ok(beneficiary, "Beneficiary retrieved successfully."))
}

#[utoipa::path(
    put,
    path = "/api/beneficiaries/{id}",
    tag = "Beneficiaries",
    params(
        ("id" = i32, Path, description = "Beneficiary user ID")
    ),
    request_body = UpdateBeneficiaryDto,
    responses(
        (status = 200, description = "Beneficiary updated", body = user::Model),
        (status = 404, description = "Not a beneficiary of the caller's facility"),
        (status = 422, description = "Validation failed")
    )
)]
#[put("/{id}")]
pub async fn update_beneficiary(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
    body: JsonBody<UpdateBeneficiaryDto>,
) -> Result<HttpResponse, AppError> {
    let ctx = resolve_user_context(&req, &app_state).await?;
    let facility = functions::caller_facility(&app_state.db, ctx.user_id()).await?;
    let beneficiary = functions::find_scoped(&app_state.db, &facility, path.into_inner()).await?;
    let updated = functions::update(&app_state.db, beneficiary, body.into_inner()).await?;
    Ok(helpers::ok(updated, "Beneficiary updated successfully."))
}

#[utoipa::path(
    delete,
    path = "/api/beneficiaries/{id}",
    tag = "Beneficiaries",
    params(
        ("id" = i32, Path, description = "Beneficiary user ID")
    ),
    responses(
        (status = 200, description = "Beneficiary deleted"),
        (status = 404, description = "Not a beneficiary of the caller's facility")
    )
)]
#[delete("/{id}")]
pub async fn delete_beneficiary(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let ctx = resolve_user_context(&req, &app_state).await?;
    let facility = functions::caller_facility(&app_state.db, ctx.user_id()).await?;
    let beneficiary = functions::find_scoped(&app_state.db, &facility, path.into_inner()).await?;
    functions::destroy(&app_state.db, beneficiary).await?;
    Ok(helpers::message_only("Beneficiary deleted successfully."))
}

// Регистрация маршрутов модуля
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/beneficiaries")
            .service(get_beneficiaries)
            .service(create_beneficiary)
            .service(get_beneficiary)
            .service(update_beneficiary)
            .service(delete_beneficiary),
    );
}
