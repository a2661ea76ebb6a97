use actix_web::web;

use crate::core::controller::{mount, SharedRepository};
use crate::modules::cafes::models::Cafes;

/// Configure cafe routes
pub fn configure(cfg: &mut web::ServiceConfig, repo: SharedRepository<Cafes>) {
    mount::<Cafes>(cfg, repo);
}
