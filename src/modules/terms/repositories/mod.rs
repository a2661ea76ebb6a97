pub mod term_repository;

pub use term_repository::MySqlTermRepository;
