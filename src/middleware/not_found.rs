use actix_web::dev::ServiceResponse;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::Result;

use super::error_handler::envelope_response;

/// 404 for unmatched routes. Resource-level 404s raised by handlers already
/// carry their own message and pass through untouched.
pub fn not_found<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    if res.response().error().is_some() {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    envelope_response(res, "Route does not exist".to_string())
}
