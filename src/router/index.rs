use crate::adventure::index::adventure_routes;
use crate::community::index::community_routes;
use actix_web::web;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(community_routes);
    cfg.configure(adventure_routes);
}
