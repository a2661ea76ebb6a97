// Cafes module: the directory's main entity and its weekly opening hours

pub mod controller;
pub mod models;
pub mod repositories;

pub use models::{Cafe, CafeChanges, CafeFilter, CafeType, Cafes, NewCafe, OpeningHours, Weekday};
pub use repositories::MySqlCafeRepository;
