pub mod facility_repository;

pub use facility_repository::MySqlFacilityRepository;
