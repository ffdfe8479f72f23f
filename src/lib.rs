pub mod adventure;
pub mod community;
pub mod config;
pub mod database;
pub mod middleware;
pub mod router;
pub mod state;
pub mod user;
pub mod utils;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get};
use serde_json::json;

use crate::utils::response::service_name;

#[get("/")]
pub async fn default() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Welcome to the Bagpack community API",
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": service_name(),
        "routes": ["/community", "/adventures"],
    }))
}
