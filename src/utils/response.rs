use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde_json::{Map, Value, json};

pub fn service_name() -> String {
    std::env::var("SERVICE_NAME").unwrap_or_else(|_| "Unknown".to_string())
}

/// Builds the standard success envelope and merges `payload`'s keys into it.
pub fn envelope(status: StatusCode, message: &str, payload: Value) -> HttpResponse {
    let mut body = Map::new();
    body.insert("success".into(), json!(true));
    body.insert("message".into(), json!(message));
    body.insert("httpStatusCode".into(), json!(status.as_u16()));
    body.insert("service".into(), json!(service_name()));

    if let Value::Object(fields) = payload {
        body.extend(fields);
    }

    HttpResponse::build(status).json(Value::Object(body))
}

pub fn ok(message: &str, payload: Value) -> HttpResponse {
    envelope(StatusCode::OK, message, payload)
}

pub fn created(message: &str, payload: Value) -> HttpResponse {
    envelope(StatusCode::CREATED, message, payload)
}
