// Reviews module: visitor ratings attached to a cafe

pub mod controller;
pub mod models;
pub mod repositories;

pub use models::{NewReview, Rating, Review, ReviewChanges, ReviewFilter, Reviews, VisitorType};
pub use repositories::MySqlReviewRepository;
