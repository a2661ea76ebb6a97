pub mod cafe_repository;

pub use cafe_repository::MySqlCafeRepository;
