use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{HttpResponse, Result};
use log::warn;
use serde_json::json;

use crate::utils::error::{CustomError, client_message};
use crate::utils::response::service_name;

fn error_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::UNAUTHORIZED => "UNAUTHORIZED_ERROR",
        StatusCode::FORBIDDEN => "FORBIDDEN_ERROR",
        StatusCode::NOT_FOUND => "NOT_FOUND_ERROR",
        StatusCode::CONFLICT => "CONFLICT_ERROR",
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => "VALIDATION_ERROR",
        s if s.is_server_error() => "INTERNAL_SERVER_ERROR",
        _ => "REQUEST_ERROR",
    }
}

/// Rewrite a response in the JSON error envelope, keeping its status.
pub fn envelope_response<B>(
    res: ServiceResponse<B>,
    message: String,
) -> Result<ErrorHandlerResponse<B>> {
    let status = res.status();
    let new_response = HttpResponse::build(status).json(json!({
        "success": false,
        "message": message,
        "httpStatusCode": status.as_u16(),
        "error": error_code(status),
        "service": service_name(),
    }));

    let (req, _) = res.into_parts();
    let res = ServiceResponse::new(req, new_response.map_into_right_body());

    Ok(ErrorHandlerResponse::Response(res))
}

/// Catch-all for error responses not produced by `CustomError`, e.g. a
/// missing bearer header or a body the extractor rejected.
pub fn handle_error<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    let already_enveloped = res
        .response()
        .error()
        .is_some_and(|err| err.as_error::<CustomError>().is_some());
    if already_enveloped {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let fallback = res.status().canonical_reason().unwrap_or("Unknown error");
    let message = match res.response().error().map(|err| err.to_string()) {
        Some(message) if !message.is_empty() => message,
        _ => fallback.to_string(),
    };

    if res.status().is_server_error() {
        warn!("{} {} failed: {message}", res.request().method(), res.request().path());
    }

    let message = client_message(res.status(), message);
    envelope_response(res, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
    use actix_web::test::TestRequest;
    use serde_json::Value;

    async fn rewrite(response: HttpResponse) -> (StatusCode, Value) {
        let req = TestRequest::default().to_http_request();
        let ErrorHandlerResponse::Response(res) =
            handle_error(ServiceResponse::new(req, response)).unwrap()
        else {
            panic!("expected an immediate response");
        };
        let status = res.status();
        let body = to_bytes(res.into_body()).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[actix_web::test]
    async fn foreign_errors_get_the_envelope() {
        let (status, body) =
            rewrite(HttpResponse::from_error(ErrorUnauthorized("missing bearer"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "UNAUTHORIZED_ERROR");
        assert_eq!(body["message"], "missing bearer");

        let (status, body) =
            rewrite(HttpResponse::from_error(ErrorInternalServerError("pool exhausted"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "INTERNAL_SERVER_ERROR");
        assert_eq!(
            body["message"],
            client_message(StatusCode::INTERNAL_SERVER_ERROR, "pool exhausted".into())
        );
    }

    #[actix_web::test]
    async fn domain_errors_pass_through() {
        let err = CustomError::ForbiddenError("Not authorized to edit this reply".into());
        let (status, body) = rewrite(HttpResponse::from_error(err)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "FORBIDDEN_ERROR");
        assert_eq!(body["message"], "Forbidden: Not authorized to edit this reply");
    }
}
