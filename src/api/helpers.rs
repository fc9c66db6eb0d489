use actix_web::{HttpResponse, http::StatusCode, web};
use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::errors::AppError;

/// `{success, data, message}` envelope used by every JSON endpoint.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
}

pub fn respond<T: Serialize>(status: StatusCode, data: Option<T>, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse {
        success: true,
        data,
        message: message.into(),
    })
}

pub fn ok<T: Serialize>(data: T, message: impl Into<String>) -> HttpResponse {
    respond(StatusCode::OK, Some(data), message)
}

pub fn created<T: Serialize>(data: T, message: impl Into<String>) -> HttpResponse {
    respond(StatusCode::CREATED, Some(data), message)
}

pub fn message_only(message: impl Into<String>) -> HttpResponse {
    respond::<()>(StatusCode::OK, None, message)
}

/// Body size limit read by the `JsonBody` extractor.
pub fn payload_config(limit: usize) -> web::PayloadConfig {
    web::PayloadConfig::new(limit)
}

/// Adds whole months, clamping to the end of shorter months (Jan 31 + 1 = Feb 28/29).
pub fn add_months(date: NaiveDate, months: i32) -> Result<NaiveDate, AppError> {
    let months = u32::try_from(months)
        .map_err(|_| AppError::InvalidInput("Duration must not be negative".to_string()))?;
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| AppError::InvalidInput("Subscription end date is out of range".to_string()))
}

/// `1999.5` -> `₱1,999.50`
pub fn format_peso(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}₱{}.{}", sign, grouped, fraction)
}
