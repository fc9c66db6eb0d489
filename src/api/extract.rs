//! JSON body extractor with field-level type errors.
//! Type mismatches become 422 keyed by the offending field (`plan_id`,
//! `documents.0.type`); broken JSON stays a 400.

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, http::StatusCode, web};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use std::ops::Deref;

use crate::{api::validation::ValidationErrors, errors::AppError};

/// Drop-in replacement for `web::Json<T>`.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for JsonBody<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

fn is_json(content_type: &str) -> bool {
    content_type == "application/json" || content_type.ends_with("+json")
}

/// `documents[0].type` -> `documents.0.type`, the root path -> `body`
fn field_key(path: &serde_path_to_error::Path) -> String {
    let key = path.to_string().replace('[', ".").replace(']', "");
    match key.trim_start_matches('.') {
        "" => "body".to_string(),
        key => key.to_string(),
    }
}

pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        log::debug!("Rejected JSON payload at {}: {}", err.path(), err.inner());
        if err.inner().is_data() {
            let field = field_key(err.path());
            let mut errors = ValidationErrors::new();
            errors.add(&field, format!("The {} field has an invalid type.", field));
            AppError::Validation(errors)
        } else {
            AppError::InvalidInput("Malformed JSON request body.".to_string())
        }
    })?;
    deserializer
        .end()
        .map_err(|_| AppError::InvalidInput("Malformed JSON request body.".to_string()))?;
    Ok(value)
}

impl<T: DeserializeOwned + 'static> FromRequest for JsonBody<T> {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let json_content = is_json(req.content_type());
        // Лимит тела берётся из web::PayloadConfig
        let bytes = web::Bytes::from_request(req, payload);

        Box::pin(async move {
            if !json_content {
                return Err(AppError::InvalidInput(
                    "Content type must be application/json.".to_string(),
                )
                .into());
            }
            let body = bytes.await.map_err(|err| {
                if err.as_response_error().status_code() == StatusCode::PAYLOAD_TOO_LARGE {
                    AppError::PayloadTooLarge
                } else {
                    log::debug!("Failed to read request body: {}", err);
                    AppError::InvalidInput("Could not read request body.".to_string())
                }
            })?;
            Ok(JsonBody(parse_body(&body)?))
        })
    }
}
