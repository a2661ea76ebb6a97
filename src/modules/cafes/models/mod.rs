pub mod cafe;
pub mod dto;
pub mod opening_hours;

pub use cafe::{Cafe, CafeType};
pub use dto::{CafeChanges, CafeFilter, Cafes, NewCafe};
pub use opening_hours::{OpeningHours, Weekday};
