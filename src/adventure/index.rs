use super::controller::{create_adventure, delete_adventure, get_adventure, list_adventures};
use crate::middleware::auth::verify_token;
use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

pub fn adventure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/adventures")
            .wrap(HttpAuthentication::bearer(verify_token))
            .route("", web::post().to(create_adventure))
            .route("", web::get().to(list_adventures))
            .route("/{id}", web::get().to(get_adventure))
            .route("/{id}", web::delete().to(delete_adventure)),
    );
}
