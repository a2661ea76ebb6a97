pub mod dto;
pub mod recommendation;

pub use dto::{NewRecommendation, RecommendationChanges, RecommendationFilter, Recommendations};
pub use recommendation::Recommendation;
