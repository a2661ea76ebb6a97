use actix_web::web;

use crate::core::controller::{mount, SharedRepository};
use crate::modules::recommendations::models::Recommendations;

/// Configure recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig, repo: SharedRepository<Recommendations>) {
    mount::<Recommendations>(cfg, repo);
}
