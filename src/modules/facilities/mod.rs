// Facilities module: amenities a café can offer (wifi, power outlets, ...)

pub mod controller;
pub mod models;
pub mod repositories;

pub use models::{Facilities, Facility, FacilityChanges, FacilityFilter, NewFacility};
pub use repositories::MySqlFacilityRepository;
