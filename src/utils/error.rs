use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::utils::response::service_name;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("Unauthorized: {0}")]
    UnauthorizedError(String),

    #[error("Bad Request: {0}")]
    BadRequestError(String),

    #[error("Forbidden: {0}")]
    ForbiddenError(String),

    #[error("Conflict: {0}")]
    ConflictError(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Not Found: {0}")]
    NotFoundError(String),

    #[error("Validation Error: {0}")]
    ValidationError(String),
}

impl CustomError {
    pub fn not_found(what: &str) -> Self {
        CustomError::NotFoundError(format!("{what} not found"))
    }

    pub fn error_code(&self) -> &'static str {
        match *self {
            CustomError::UnauthorizedError(..) => "UNAUTHORIZED_ERROR",
            CustomError::BadRequestError(..) => "BAD_REQUEST_ERROR",
            CustomError::ForbiddenError(..) => "FORBIDDEN_ERROR",
            CustomError::ConflictError(..) => "CONFLICT_ERROR",
            CustomError::InternalServerError(..) => "INTERNAL_SERVER_ERROR",
            CustomError::NotFoundError(..) => "NOT_FOUND_ERROR",
            CustomError::ValidationError(..) => "VALIDATION_ERROR",
        }
    }

    /// Message exposed to clients. Internal details are hidden in production.
    pub fn public_message(&self) -> String {
        client_message(self.status_code(), self.to_string())
    }
}

fn is_production() -> bool {
    std::env::var("APP_ENV")
        .map(|env| env.eq_ignore_ascii_case("production"))
        .unwrap_or(false)
}

/// Message a client may see for a failed request. Server errors are
/// replaced by a generic message in production.
pub fn client_message(status: StatusCode, message: String) -> String {
    redact(status, message, is_production())
}

fn redact(status: StatusCode, message: String, production: bool) -> String {
    if production && status.is_server_error() {
        "Something went wrong".to_string()
    } else {
        message
    }
}

impl From<mongodb::error::Error> for CustomError {
    fn from(err: mongodb::error::Error) -> Self {
        log::error!("database error: {err}");
        CustomError::InternalServerError(format!("Database error: {err}"))
    }
}

impl From<mongodb::bson::ser::Error> for CustomError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        log::error!("bson serialization error: {err}");
        CustomError::InternalServerError(format!("Serialization error: {err}"))
    }
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::UnauthorizedError(..) => StatusCode::UNAUTHORIZED,
            CustomError::BadRequestError(..) => StatusCode::BAD_REQUEST,
            CustomError::ForbiddenError(..) => StatusCode::FORBIDDEN,
            CustomError::ConflictError(..) => StatusCode::CONFLICT,
            CustomError::InternalServerError(..) => StatusCode::INTERNAL_SERVER_ERROR,
            CustomError::NotFoundError(..) => StatusCode::NOT_FOUND,
            CustomError::ValidationError(..) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_message = json!({
            "success": false,
            "message": self.public_message(),
            "httpStatusCode": self.status_code().as_u16(),
            "error": self.error_code(),
            "service": service_name(),
        });

        HttpResponse::build(self.status_code()).json(error_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            CustomError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(CustomError::not_found("Post").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            CustomError::ForbiddenError("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            CustomError::ConflictError("x".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn production_hides_server_error_details_only() {
        let leak = "Database error: connection refused".to_string();

        assert_eq!(
            redact(StatusCode::INTERNAL_SERVER_ERROR, leak.clone(), true),
            "Something went wrong"
        );
        assert_eq!(redact(StatusCode::BAD_GATEWAY, leak.clone(), true), "Something went wrong");
        assert_eq!(redact(StatusCode::INTERNAL_SERVER_ERROR, leak.clone(), false), leak);
        assert_eq!(
            redact(StatusCode::FORBIDDEN, "Forbidden: nope".into(), true),
            "Forbidden: nope"
        );
    }

    #[test]
    fn not_found_message_names_the_resource() {
        let err = CustomError::not_found("Reply");
        assert_eq!(err.to_string(), "Not Found: Reply not found");
        assert_eq!(err.error_code(), "NOT_FOUND_ERROR");
    }
}
