use actix_web::web;

use crate::core::controller::{mount, SharedRepository};
use crate::modules::facilities::models::Facilities;

/// Configure facility routes
/// GET|POST /facilities, PATCH|PUT|DELETE /facilities/{id}
pub fn configure(cfg: &mut web::ServiceConfig, repo: SharedRepository<Facilities>) {
    mount::<Facilities>(cfg, repo);
}
