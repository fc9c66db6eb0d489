use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::api::validation::ValidationErrors;

/// Унифицированная структура ответа об ошибке
#[derive(Serialize)]
pub struct ErrorResponse<'a> {
    pub success: bool,
    pub code: &'a str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<&'a BTreeMap<String, Vec<String>>>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbError(#[from] DbErr),

    #[error("The given data was invalid.")]
    Validation(ValidationErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("You have already registered a facility.")]
    DuplicateFacility,

    #[error("Center ID {0} is already taken.")]
    DuplicateCenterId(String),

    #[error("A subscription plan named {0} already exists.")]
    DuplicatePlanName(String),

    #[error("Subscription plan not found.")]
    PlanNotFound,

    #[error("Cannot manually subscribe to the Free plan.")]
    FreePlanDirectSubscribeForbidden,

    #[error("You already have a pending subscription. Only one pending subscription is allowed.")]
    PendingAlreadyExists,

    #[error("No pending subscription found.")]
    NoPendingSubscription,

    #[error("Cannot delete subscription plan with active subscriptions.")]
    PlanInUse,

    #[error("No facility found. Please register a facility first.")]
    NoFacility,

    #[error("Your facility must be approved before you can register beneficiaries.")]
    FacilityNotApproved,

    #[error("Request body is too large.")]
    PayloadTooLarge,

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Internal server error")]
    Internal,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DbError(_) | AppError::PasswordHash(_) | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_)
            | AppError::PlanNotFound
            | AppError::NoPendingSubscription
            | AppError::NoFacility => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_)
            | AppError::DuplicateFacility
            | AppError::DuplicateCenterId(_)
            | AppError::DuplicatePlanName(_)
            | AppError::FreePlanDirectSubscribeForbidden
            | AppError::PendingAlreadyExists
            | AppError::PlanInUse
            | AppError::FacilityNotApproved => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Детали серверных ошибок только в лог, клиенту общее сообщение
        let message = if status.is_server_error() {
            log::error!("{}", self);
            "Something went wrong while processing the request.".to_string()
        } else {
            self.to_string()
        };
        let errors = match self {
            AppError::Validation(errors) => Some(errors.as_map()),
            _ => None,
        };
        let body = ErrorResponse {
            success: false,
            code: self.code(),
            message,
            errors,
        };
        HttpResponse::build(status).json(body)
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DbError(_) => "DB_ERROR",
            AppError::Validation(_) => "VALIDATION_FAILED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::DuplicateFacility => "DUPLICATE_FACILITY",
            AppError::DuplicateCenterId(_) => "DUPLICATE_CENTER_ID",
            AppError::DuplicatePlanName(_) => "DUPLICATE_PLAN_NAME",
            AppError::PlanNotFound => "PLAN_NOT_FOUND",
            AppError::FreePlanDirectSubscribeForbidden => "FREE_PLAN_FORBIDDEN",
            AppError::PendingAlreadyExists => "PENDING_ALREADY_EXISTS",
            AppError::NoPendingSubscription => "NO_PENDING_SUBSCRIPTION",
            AppError::PlanInUse => "PLAN_IN_USE",
            AppError::NoFacility => "NO_FACILITY",
            AppError::FacilityNotApproved => "FACILITY_NOT_APPROVED",
            AppError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            AppError::PasswordHash(_) => "PASSWORD_HASH_ERROR",
            AppError::Internal => "INTERNAL",
        }
    }
}
