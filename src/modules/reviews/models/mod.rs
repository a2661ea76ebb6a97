pub mod dto;
pub mod rating;
pub mod review;

pub use dto::{NewReview, ReviewChanges, ReviewFilter, Reviews};
pub use rating::Rating;
pub use review::{Review, VisitorType};
