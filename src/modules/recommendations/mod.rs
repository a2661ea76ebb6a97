// Recommendations module: editorial picks featured on the home page

pub mod controller;
pub mod models;
pub mod repositories;

pub use models::{
    NewRecommendation, Recommendation, RecommendationChanges, RecommendationFilter,
    Recommendations,
};
pub use repositories::MySqlRecommendationRepository;
