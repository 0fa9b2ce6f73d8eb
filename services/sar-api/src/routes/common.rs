use actix_web::{error, web, HttpResponse};
use sar_core::{ErrorCode, SarError};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: message.into(),
    })
}

pub fn not_found(message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: message.into(),
    })
}

pub fn internal_error(message: impl Into<String>) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: message.into(),
    })
}

pub fn engine_error(err: SarError) -> HttpResponse {
    match err.code {
        ErrorCode::InvalidInput => bad_request(err.message),
        ErrorCode::NotFound => not_found(err.message),
        ErrorCode::Internal => {
            warn!(error = %err, "Request failed");
            internal_error(err.message)
        }
    }
}

/// Malformed bodies answer with the same `{error}` shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = bad_request(format!("Invalid request body: {err}"));
        error::InternalError::from_response(err, response).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = bad_request(format!("Invalid query: {err}"));
        error::InternalError::from_response(err, response).into()
    })
}
