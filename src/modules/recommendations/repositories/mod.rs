pub mod recommendation_repository;

pub use recommendation_repository::MySqlRecommendationRepository;
