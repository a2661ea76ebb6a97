//! Resource modules and their wiring.

use std::sync::Arc;

use actix_web::web;
use sqlx::MySqlPool;

use crate::core::controller::SharedRepository;

pub mod cafes;
pub mod facilities;
pub mod health;
pub mod recommendations;
pub mod reviews;
pub mod shared;
pub mod terms;

/// One repository per resource.
///
/// Tests swap in their own implementations; the server builds these from a
/// MySQL pool.
#[derive(Clone)]
pub struct Repositories {
    pub cafes: SharedRepository<cafes::Cafes>,
    pub terms: SharedRepository<terms::Terms>,
    pub facilities: SharedRepository<facilities::Facilities>,
    pub recommendations: SharedRepository<recommendations::Recommendations>,
    pub reviews: SharedRepository<reviews::Reviews>,
}

impl Repositories {
    pub fn mysql(pool: MySqlPool) -> Self {
        Self {
            cafes: Arc::new(cafes::MySqlCafeRepository::new(pool.clone())),
            terms: Arc::new(terms::MySqlTermRepository::new(pool.clone())),
            facilities: Arc::new(facilities::MySqlFacilityRepository::new(pool.clone())),
            recommendations: Arc::new(recommendations::MySqlRecommendationRepository::new(
                pool.clone(),
            )),
            reviews: Arc::new(reviews::MySqlReviewRepository::new(pool)),
        }
    }

    /// Mount the CRUD routes of every resource
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cafes::controller::configure(cfg, self.cafes.clone());
        terms::controller::configure(cfg, self.terms.clone());
        facilities::controller::configure(cfg, self.facilities.clone());
        recommendations::controller::configure(cfg, self.recommendations.clone());
        reviews::controller::configure(cfg, self.reviews.clone());
    }
}
