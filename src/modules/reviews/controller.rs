use actix_web::web;

use crate::core::controller::{mount, SharedRepository};
use crate::modules::reviews::models::Reviews;

/// Configure review routes
pub fn configure(cfg: &mut web::ServiceConfig, repo: SharedRepository<Reviews>) {
    mount::<Reviews>(cfg, repo);
}
