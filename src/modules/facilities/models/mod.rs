pub mod dto;
pub mod facility;

pub use dto::{Facilities, FacilityChanges, FacilityFilter, NewFacility};
pub use facility::Facility;
