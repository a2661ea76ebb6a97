use actix_web::web;

use crate::core::controller::{mount, SharedRepository};
use crate::modules::terms::models::Terms;

/// Configure term routes
pub fn configure(cfg: &mut web::ServiceConfig, repo: SharedRepository<Terms>) {
    mount::<Terms>(cfg, repo);
}
