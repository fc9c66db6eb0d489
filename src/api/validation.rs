//! Field-level validation of incoming DTOs.
//! Errors are collected per field and returned together as a single 422.

use regex::Regex;
use std::collections::BTreeMap;

use crate::errors::AppError;

lazy_static::lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^[0-9+]{6,20}$").unwrap();
}

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// `Ok(())` when nothing was collected, otherwise a 422 `AppError`.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }

    pub fn required(&mut self, field: &str, value: Option<&str>, max: usize) {
        match value.map(str::trim) {
            None | Some("") => self.add(field, format!("The {} field is required.", field)),
            Some(v) => self.max_len(field, v, max),
        }
    }

    pub fn optional(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(v) = value {
            self.max_len(field, v, max);
        }
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if !ensure_max_len(value, max) {
            self.add(
                field,
                format!("The {} field must not be greater than {} characters.", field, max),
            );
        }
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) {
        match value.map(str::trim) {
            None | Some("") => self.add(field, format!("The {} field is required.", field)),
            Some(v) => {
                if !validate_email(v) {
                    self.add(field, format!("The {} field must be a valid email address.", field));
                } else if v != v.to_lowercase() {
                    self.add(field, format!("The {} field must be lowercase.", field));
                }
                self.max_len(field, v, 255);
            }
        }
    }

    pub fn range_f64(&mut self, field: &str, value: Option<f64>, min: f64, max: f64) {
        if let Some(v) = value {
            if !v.is_finite() || v < min || v > max {
                self.add(
                    field,
                    format!("The {} field must be between {} and {}.", field, min, max),
                );
            }
        }
    }

    pub fn range_i32(&mut self, field: &str, value: Option<i32>, min: i32, max: i32) {
        if let Some(v) = value {
            if v < min || v > max {
                self.add(
                    field,
                    format!("The {} field must be between {} and {}.", field, min, max),
                );
            }
        }
    }

    pub fn password(&mut self, password: Option<&str>, confirmation: Option<&str>) {
        match password {
            None | Some("") => self.add("password", "The password field is required."),
            Some(p) => {
                if p.chars().count() < MIN_PASSWORD_LEN {
                    self.add(
                        "password",
                        format!("The password field must be at least {} characters.", MIN_PASSWORD_LEN),
                    );
                }
                if confirmation != Some(p) {
                    self.add("password", "The password field confirmation does not match.");
                }
            }
        }
    }

    pub fn contact_number(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
            if sanitize_phone(v).is_none() {
                self.add(field, format!("The {} field format is invalid.", field));
            }
            self.max_len(field, v, 20);
        }
    }
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn sanitize_phone(phone: &str) -> Option<String> {
    let digits: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    if PHONE_RE.is_match(&digits) {
        Some(digits)
    } else {
        None
    }
}

pub fn ensure_max_len(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}
