use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};

use crate::{
    api::{
        context::{resolve_admin_context, resolve_user_context},
        extract::JsonBody,
        helpers,
        validation::ValidationErrors,
    },
    app_state::AppState,
    errors::AppError,
};

use super::{
    functions,
    structures::{FacilityStatusDto, FacilityView, RegisterFacilityDto, UpdateFacilityDto},
};

#[utoipa::path(
    get,
    path = "/api/my-facilities",
    tag = "Facilities",
    responses(
        (status = 200, description = "Zero or one facility owned by the caller", body = [FacilityView]),
        (status = 401, description = "Missing or invalid cookies")
    )
)]
#[get("/my-facilities")]
pub async fn get_my_facilities(
    app_state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = resolve_user_context(&req, &app_state).await?;
    let facilities = functions::list_mine(&app_state.db, ctx.user_id()).await?;
    Ok(helpers::ok(facilities, "Facilities retrieved successfully."))
}

#[utoipa::path(
    get,
    path = "/api/financial-aid",
    tag = "Facilities",
    responses(
        (status = 200, description = "All facilities with owners and documents", body = [FacilityView]),
        (status = 403, description = "Admin role required")
    )
)]
#[get("")]
pub async fn get_facilities(
    app_state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    resolve_admin_context(&req, &app_state).await?;
    let facilities = functions::list_all(&app_state.db).await?;
    Ok(helpers::ok(facilities, "Facilities retrieved successfully."))
}

#[utoipa::path(
    post,
    path = "/api/financial-aid",
    tag = "Facilities",
    request_body = RegisterFacilityDto,
    responses(
        (status = 201, description = "Facility registered, awaiting approval", body = FacilityView),
        (status = 422, description = "Validation failed, duplicate facility or center id")
    )
)]
#[post("")]
pub async fn register_facility(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    body: JsonBody<RegisterFacilityDto>,
) -> Result<HttpResponse, AppError> {
    let ctx = resolve_user_context(&req, &app_state).await?;
    let view = functions::register(&app_state.db, ctx.user_id(), body.into_inner()).await?;
    Ok(helpers::created(
        view,
        "Facility registration submitted successfully. Awaiting admin approval.",
    ))
}

#[utoipa::path(
    get,
    path = "/api/financial-aid/{id}",
    tag = "Facilities",
    params(
        ("id" = i32, Path, description = "Facility ID")
    ),
    responses(
        (status = 200, description = "Facility found", body = FacilityView),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Facility not found")
    )
)]
#[get("/{id}")]
pub async fn get_facility(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let ctx = resolve_user_context(&req, &app_state).await?;
    let facility = functions::find_facility(&app_state.db, path.into_inner()).await?;
    functions::ensure_can_manage(&ctx, &facility)?;
    let view = functions::load_view(&app_state.db, facility).await?;
    Ok(helpers::ok(view, "Facility retrieved successfully."))
}

#[utoipa::path(
    put,
    path = "/api/financial-aid/{id}",
    tag = "Facilities",
    params(
        ("id" = i32, Path, description = "Facility ID")
    ),
    request_body = UpdateFacilityDto,
    responses(
        (status = 200, description = "Facility updated", body = crate::database::models::financial_aid::Model),
        (status = 404, description = "Facility not found"),
        (status = 422, description = "Validation failed")
    )
)]
#[put("/{id}")]
pub async fn update_facility(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
    body: JsonBody<UpdateFacilityDto>,
) -> Result<HttpResponse, AppError> {
    let ctx = resolve_user_context(&req, &app_state).await?;
    let facility = functions::find_facility(&app_state.db, path.into_inner()).await?;
    functions::ensure_can_manage(&ctx, &facility)?;
    let updated = functions::update(&app_state.db, facility, body.into_inner()).await?;
    Ok(helpers::ok(updated, "Facility updated successfully"))
}

#[utoipa::path(
    patch,
    path = "/api/financial-aid/{id}/status",
    tag = "Facilities",
    params(
        ("id" = i32, Path, description = "Facility ID")
    ),
    request_body = FacilityStatusDto,
    responses(
        (status = 200, description = "Facility approved or rejected", body = crate::database::models::financial_aid::Model),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Facility not found")
    )
)]
#[patch("/{id}/status")]
pub async fn update_facility_status(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
    body: JsonBody<FacilityStatusDto>,
) -> Result<HttpResponse, AppError> {
    resolve_admin_context(&req, &app_state).await?;

    let Some(approved) = body.is_managable else {
        let mut errors = ValidationErrors::new();
        errors.add("isManagable", "The isManagable field is required.");
        return Err(AppError::Validation(errors));
    };

    let facility = functions::set_approval(&app_state.db, path.into_inner(), approved).await?;
    let status = if approved { "approved" } else { "rejected" };
    Ok(helpers::ok(facility, format!("Facility has been {}", status)))
}

#[utoipa::path(
    delete,
    path = "/api/financial-aid/{id}",
    tag = "Facilities",
    params(
        ("id" = i32, Path, description = "Facility ID")
    ),
    responses(
        (status = 200, description = "Facility deleted"),
        (status = 404, description = "Facility not found")
    )
)]
#[delete("/{id}")]
pub async fn delete_facility(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let ctx = resolve_user_context(&req, &app_state).await?;
    let facility = functions::find_facility(&app_state.db, path.into_inner()).await?;
    functions::ensure_can_manage(&ctx, &facility)?;
    functions::delete(&app_state.db, facility).await?;
    Ok(helpers::message_only("Facility deleted successfully"))
}

// Регистрация маршрутов модуля
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_my_facilities).service(
        web::scope("/financial-aid")
            .service(get_facilities)
            .service(register_facility)
            .service(update_facility_status)
            .service(get_facility)
            .service(update_facility)
            .service(delete_facility),
    );
}
